//! RTP hint track boxes: the generic hint sample entry, hint track
//! information and the hint statistics counters.

use super::{container, opt_str};
use crate::boxes::{BoxBody, IsoBox};
use crate::dump::{Result, Trace};
use crate::util::xml_escape;
use std::io::Write;

/// Element and attribute name of a single valued hint statistic.
fn counter_names(code: &[u8; 4]) -> Option<(&'static str, &'static str)> {
    let names = match code {
        b"trpy" => ("LargeTotalRTPBytesBox", "RTPBytesSent"),
        b"totl" => ("TotalRTPBytesBox", "RTPBytesSent"),
        b"nump" => ("LargeTotalPacketBox", "PacketsSent"),
        b"npck" => ("TotalPacketBox", "packetsSent"),
        b"tpyl" => ("LargeTotalMediaBytesBox", "BytesSent"),
        b"tpay" => ("TotalMediaBytesBox", "BytesSent"),
        b"dmed" => ("BytesFromMediaTrackBox", "BytesSent"),
        b"dimm" => ("ImmediateDataBytesBox", "BytesSent"),
        b"drep" => ("RepeatedDataBytesBox", "RepeatedBytes"),
        b"tmin" => ("MinTransmissionTimeBox", "MinimumTransmitTime"),
        b"tmax" => ("MaxTransmissionTimeBox", "MaximumTransmitTime"),
        b"pmax" => ("MaxPacketSizeBox", "MaximumSize"),
        b"dmax" => ("MaxPacketDurationBox", "MaximumDuration"),
        b"snro" => ("PacketSequenceOffsetBox", "SeqNumOffset"),
        b"tims" => ("RTPTimeScaleBox", "TimeScale"),
        b"tsro" => ("TimeStampOffsetBox", "TimeStampOffset"),
        b"rtpo" => ("RTPTimeOffsetBox", "PacketTimeOffset"),
        _ => return None,
    };
    Some(names)
}

/// SDP text inside a comment. `--` may not appear in one.
fn sdp_comment(t: &mut Trace<'_>, sdp: &Option<String>) -> Result<()> {
    if let Some(text) = sdp {
        writeln!(t, "<!-- sdp text: {} -->", text.replace("--", "- -"))?;
    }
    Ok(())
}

pub fn counter(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, HintCounter);
    let Some((name, attr)) = counter_names(&b.typ.0) else {
        return Err(crate::dump::mismatch(b));
    };
    t.open(name, b)?;
    writeln!(t, "{attr}=\"{}\">", p.value)?;
    t.done(Some(name), Some(b))
}

pub fn maxr(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, MaxDataRate);
    t.open("MaxDataRateBox", b)?;
    writeln!(
        t,
        "MaxDataRate=\"{}\" Granularity=\"{}\">",
        p.max_data_rate, p.granularity
    )?;
    t.done(Some("MaxDataRateBox"), Some(b))
}

pub fn payt(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, PayloadType);
    t.open("PayloadTypeBox", b)?;
    writeln!(
        t,
        "PayloadID=\"{}\" PayloadString=\"{}\">",
        p.payload_code,
        xml_escape(opt_str(&p.payload_string))
    )?;
    t.done(Some("PayloadTypeBox"), Some(b))
}

pub fn name(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, HintName);
    t.open("NameBox", b)?;
    writeln!(t, "Name=\"{}\">", xml_escape(opt_str(&p.string)))?;
    t.done(Some("NameBox"), Some(b))
}

pub fn rely(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, RelyHint);
    t.open("RelyTransmissionBox", b)?;
    writeln!(t, "Prefered=\"{}\" required=\"{}\">", p.prefered, p.required)?;
    t.done(Some("RelyTransmissionBox"), Some(b))
}

pub fn hinf(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    container(t, "HintInfoBox", b)
}

fn rtp_info(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, RtpInfo);
    writeln!(
        t,
        "<RTPInfoBox subType=\"{}\">",
        xml_escape(&p.sub_type.as_str_lossy())
    )?;
    sdp_comment(t, &p.sdp_text)?;
    t.done(Some("RTPInfoBox"), Some(b))
}

/// `rtp ` is both the hint sample entry and, inside `hnti`, the session
/// SDP. The payload tells them apart.
pub fn ghnt(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    if let BoxBody::RtpInfo(_) = b.body {
        return rtp_info(b, t);
    }
    let p = body!(b, HintSampleEntry);
    t.open("GenericHintSampleEntryBox", b)?;
    writeln!(
        t,
        "EntrySubType=\"{}\" DataReferenceIndex=\"{}\" HintTrackVersion=\"{}\" LastCompatibleVersion=\"{}\" MaxPacketSize=\"{}\">",
        xml_escape(&b.typ.as_str_lossy()),
        p.data_reference_index,
        p.hint_track_version,
        p.last_compatible_version,
        p.max_packet_size
    )?;
    t.children(&p.hint_data_table)?;
    t.done(Some("GenericHintSampleEntryBox"), Some(b))
}

/// Children of `hnti` are all unattached; the session `rtp ` entry is
/// written inline.
pub fn hnti(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    t.open("HintTrackInfoBox", b)?;
    writeln!(t, ">")?;
    for child in &b.other_boxes {
        match child.body {
            BoxBody::RtpInfo(_) => rtp_info(child, t)?,
            _ => t.child(Some(child))?,
        }
    }
    t.done(Some("HintTrackInfoBox"), None)
}

pub fn sdp(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Sdp);
    t.open("SDPBox", b)?;
    writeln!(t, ">")?;
    sdp_comment(t, &p.sdp_text)?;
    t.done(Some("SDPBox"), Some(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_counter_code_has_names() {
        for code in [
            b"trpy", b"totl", b"nump", b"npck", b"tpyl", b"tpay", b"dmed", b"dimm", b"drep",
            b"tmin", b"tmax", b"pmax", b"dmax", b"snro", b"tims", b"tsro", b"rtpo",
        ] {
            assert!(counter_names(code).is_some(), "{}", String::from_utf8_lossy(code));
        }
        assert!(counter_names(b"maxr").is_none());
    }
}
