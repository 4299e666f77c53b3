use anyhow::{Context, bail};
use clap::Parser;
use mp4trace::{TreeDocument, dump_file, dump_protected_entries, dump_schema};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "XML trace of an ISOBMFF box tree")]
struct Args {
    /// JSON box tree (`{"name": ..., "boxes": [...]}`)
    input: Option<PathBuf>,

    /// Write the placeholder schema of every known box type instead
    #[arg(long)]
    schema: bool,

    /// Output file (stdout when absent)
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Only list the protected sample descriptions of this track (0-based
    /// index among the `trak` boxes of `moov`)
    #[arg(long)]
    protection: Option<usize>,
}

fn open_output(path: &Option<PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("creating {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut out = open_output(&args.out)?;

    if args.schema {
        dump_schema(&mut out).context("writing schema")?;
        out.flush()?;
        return Ok(());
    }

    let Some(input) = &args.input else {
        bail!("an input tree is required unless --schema is given");
    };
    let f = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let doc = TreeDocument::from_reader(BufReader::new(f))
        .with_context(|| format!("reading {}", input.display()))?;

    match args.protection {
        Some(index) => {
            let trak = doc
                .boxes
                .iter()
                .filter(|b| &b.typ.0 == b"moov")
                .flat_map(|moov| moov.tracks())
                .nth(index)
                .with_context(|| format!("no track {index}"))?;
            dump_protected_entries(trak, &mut out).context("writing sample descriptions")?;
        }
        None => dump_file(&doc.name, &doc.boxes, &mut out).context("writing trace")?,
    }
    out.flush()?;
    Ok(())
}
