use anyhow::Context;
use clap::Parser;
use mp4trace::{MediaSample, TextExportFormat, box_from_reader, export_text};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Export a 3GPP timed text track as TTXT, SRT or SVG")]
struct Args {
    /// JSON `trak` box
    trak: PathBuf,

    /// JSON list of samples (`[{"dts": ..., "data": [...], "description_index": 1}]`)
    samples: PathBuf,

    /// ttxt, srt or svg
    #[arg(long, short, default_value = "ttxt")]
    format: String,

    /// NHML index written next to an SVG export
    #[arg(long)]
    nhml: Option<PathBuf>,

    /// Output file (stdout when absent)
    #[arg(long, short)]
    out: Option<PathBuf>,
}

fn create(p: &Path) -> anyhow::Result<BufWriter<File>> {
    Ok(BufWriter::new(
        File::create(p).with_context(|| format!("creating {}", p.display()))?,
    ))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let format: TextExportFormat = args.format.parse()?;

    let f = File::open(&args.trak).with_context(|| format!("opening {}", args.trak.display()))?;
    let trak = box_from_reader(BufReader::new(f))
        .with_context(|| format!("reading {}", args.trak.display()))?;
    let f = File::open(&args.samples)
        .with_context(|| format!("opening {}", args.samples.display()))?;
    let samples: Vec<MediaSample> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("reading {}", args.samples.display()))?;

    let mut out: Box<dyn Write> = match &args.out {
        Some(p) => Box::new(create(p)?),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut nhml = match (&args.nhml, format) {
        (Some(p), _) => Some(create(p)?),
        (None, TextExportFormat::Svg) => {
            let p = args
                .out
                .as_ref()
                .map(|o| o.with_extension("nhml"))
                .context("SVG export needs --nhml or --out")?;
            Some(create(&p)?)
        }
        (None, _) => None,
    };

    export_text(
        &trak,
        samples.as_slice(),
        format,
        &mut out,
        nhml.as_mut().map(|w| w as &mut dyn Write),
    )
    .context("exporting text track")?;
    out.flush()?;
    if let Some(w) = nhml.as_mut() {
        w.flush()?;
    }
    Ok(())
}
