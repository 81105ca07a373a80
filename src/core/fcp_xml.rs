//! FCP7 XML interchange export.
//!
//! Serializes the timeline into the `<xmeml>` schema: one `<file>` and one
//! `<clipitem>` per timeline item inside a single video track, plus an empty
//! audio track. Pure string builder; disk IO and the save dialog belong to
//! the caller. Frame counts come from rounding the cumulative interval
//! boundaries, never from summing per-item rounds, so boundaries cannot
//! drift from `round(cumulative_seconds * fps)`.

use crate::constants::{EXPORT_SEQUENCE_HEIGHT, EXPORT_SEQUENCE_WIDTH};
use crate::core::extract::{TimelineItem, TimelineItemKind};

/// Extensions carried through to the synthetic file names; anything else
/// falls back to the kind default.
const KNOWN_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "jpg", "jpeg", "png", "gif", "webp"];

/// Build the complete XML document. `boundaries` is the layout engine's
/// interval array (`items.len() + 1` entries). The caller is responsible for
/// refusing to export an empty timeline.
pub fn build_fcp_xml(
    items: &[TimelineItem],
    boundaries: &[f64],
    project_name: &str,
    fps: u32,
) -> String {
    let seconds_to_frames = |seconds: f64| -> i64 { (seconds * fps as f64).round() as i64 };

    let mut file_parts = Vec::with_capacity(items.len());
    let mut clip_parts = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let rec_start = boundaries.get(index).copied().unwrap_or(0.0);
        let rec_end = boundaries
            .get(index + 1)
            .copied()
            .unwrap_or(rec_start + item.duration_seconds);
        let rec_start_frames = seconds_to_frames(rec_start);
        let rec_end_frames = seconds_to_frames(rec_end);
        let duration_frames = rec_end_frames - rec_start_frames;

        let file_name = format!("{:03}.{}", index + 1, item_extension(item));
        let path_url = format!("media/{}", file_name);
        let file_id = format!("file-{}", index + 1);
        let clip_item_id = format!("clipitem-{}", index + 1);

        file_parts.push(format!(
            "<file id=\"{file_id}\">\
             <name>{}</name>\
             <pathurl>{}</pathurl>\
             <rate><timebase>{fps}</timebase><ntsc>FALSE</ntsc></rate>\
             <duration>{duration_frames}</duration></file>",
            escape_xml(&file_name),
            escape_xml(&path_url),
        ));
        clip_parts.push(format!(
            "<clipitem id=\"{clip_item_id}\">\
             <name>{}</name>\
             <enabled>TRUE</enabled>\
             <duration>{duration_frames}</duration>\
             <rate><timebase>{fps}</timebase><ntsc>FALSE</ntsc></rate>\
             <start>{rec_start_frames}</start><end>{rec_end_frames}</end>\
             <in>0</in><out>{duration_frames}</out>\
             <file id=\"{file_id}\"/>\
             </clipitem>",
            escape_xml(&item.label),
        ));
    }

    let total_frames = if items.is_empty() {
        0
    } else {
        seconds_to_frames(boundaries.last().copied().unwrap_or(0.0))
    };

    let file_lines = file_parts
        .iter()
        .map(|part| format!("        {}", part))
        .collect::<Vec<_>>()
        .join("\n");
    let clip_lines = clip_parts
        .iter()
        .map(|part| format!("              {}", part))
        .collect::<Vec<_>>()
        .join("\n");

    let name = escape_xml(project_name);
    let width = EXPORT_SEQUENCE_WIDTH;
    let height = EXPORT_SEQUENCE_HEIGHT;
    let sequence = format!(
        "        <sequence id=\"sequence-1\">\n\
         \x20         <name>{name}</name>\n\
         \x20         <duration>{total_frames}</duration>\n\
         \x20         <rate><timebase>{fps}</timebase><ntsc>FALSE</ntsc></rate>\n\
         \x20         <media>\n\
         \x20           <video>\n\
         \x20             <format>\n\
         \x20               <samplecharacteristics>\n\
         \x20                 <width>{width}</width>\n\
         \x20                 <height>{height}</height>\n\
         \x20                 <anamorphic>FALSE</anamorphic>\n\
         \x20                 <pixelaspectratio>square</pixelaspectratio>\n\
         \x20                 <fielddominance>none</fielddominance>\n\
         \x20                 <rate><timebase>{fps}</timebase><ntsc>FALSE</ntsc></rate>\n\
         \x20               </samplecharacteristics>\n\
         \x20             </format>\n\
         \x20             <track>\n\
         {clip_lines}\n\
         \x20             </track>\n\
         \x20           </video>\n\
         \x20           <audio>\n\
         \x20             <numOutputChannels>2</numOutputChannels>\n\
         \x20             <format>\n\
         \x20               <samplecharacteristics>\n\
         \x20                 <depth>16</depth>\n\
         \x20                 <samplerate>48000</samplerate>\n\
         \x20               </samplecharacteristics>\n\
         \x20             </format>\n\
         \x20             <track/>\n\
         \x20           </audio>\n\
         \x20         </media>\n\
         \x20       </sequence>"
    );

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE xmeml>\n\
         <xmeml version=\"4\">\n\
         \x20 <project>\n\
         \x20   <name>{name}</name>\n\
         \x20   <children>\n\
         \x20     <bin>\n\
         \x20       <name>{name}</name>\n\
         \x20       <children>\n\
         {file_lines}\n\
         {sequence}\n\
         \x20       </children>\n\
         \x20     </bin>\n\
         \x20   </children>\n\
         \x20 </project>\n\
         </xmeml>"
    )
}

fn item_extension(item: &TimelineItem) -> String {
    let from_media = item
        .media
        .as_ref()
        .and_then(|media| media.extension())
        .filter(|ext| KNOWN_EXTENSIONS.contains(&ext.as_str()));
    match from_media {
        Some(ext) => ext,
        None => match item.kind {
            TimelineItemKind::Video => "mp4".to_string(),
            TimelineItemKind::Image => "jpg".to_string(),
        },
    }
}

/// Escape free text for XML content and attribute positions.
fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::TimelineItemKind;
    use crate::core::layout::TimelineLayout;
    use crate::state::MediaSource;
    use std::path::Path;

    fn item(id: &str, kind: TimelineItemKind, duration: f64, url: Option<&str>) -> TimelineItem {
        TimelineItem {
            id: id.to_string(),
            scene_index: 0,
            frame_index: None,
            kind,
            label: id.to_string(),
            duration_seconds: duration,
            media: url.and_then(|url| MediaSource::classify(url, Path::new("/w"))),
            thumb: None,
        }
    }

    fn scenario_a() -> TimelineLayout {
        TimelineLayout::new(vec![
            item("Img 1", TimelineItemKind::Image, 2.0, Some("a.png")),
            item("Img 2", TimelineItemKind::Image, 2.0, Some("b.png")),
            item("Clip", TimelineItemKind::Video, 5.0, Some("c.mp4")),
        ])
    }

    #[test]
    fn test_frame_boundaries_at_30fps() {
        let layout = scenario_a();
        let xml = build_fcp_xml(layout.items(), layout.boundaries(), "Demo", 30);
        // Intervals: [0,60), [60,120), [120,270).
        assert!(xml.contains("<start>0</start><end>60</end>"));
        assert!(xml.contains("<start>60</start><end>120</end>"));
        assert!(xml.contains("<start>120</start><end>270</end>"));
        assert!(xml.contains("<duration>270</duration>"));
        assert!(xml.contains("<in>0</in><out>150</out>"));
    }

    #[test]
    fn test_cumulative_rounding_does_not_drift() {
        // Durations that each round badly on their own.
        let items: Vec<TimelineItem> = (0..7)
            .map(|i| item(&format!("i{}", i), TimelineItemKind::Image, 0.35, None))
            .collect();
        let layout = TimelineLayout::new(items);
        let xml = build_fcp_xml(layout.items(), layout.boundaries(), "Drift", 30);
        for (index, pair) in layout.boundaries().windows(2).enumerate() {
            let start = (pair[0] * 30.0).round() as i64;
            let end = (pair[1] * 30.0).round() as i64;
            let _ = index;
            assert!(xml.contains(&format!("<start>{}</start><end>{}</end>", start, end)));
        }
        // Total equals the rounded final boundary, not a sum of rounds.
        let total = (layout.total_duration() * 30.0).round() as i64;
        assert!(xml.contains(&format!("<duration>{}</duration>\n", total)));
    }

    #[test]
    fn test_synthetic_file_entries() {
        let layout = scenario_a();
        let xml = build_fcp_xml(layout.items(), layout.boundaries(), "Demo", 30);
        assert!(xml.contains("<file id=\"file-1\"><name>001.png</name><pathurl>media/001.png</pathurl>"));
        assert!(xml.contains("<file id=\"file-3\"><name>003.mp4</name><pathurl>media/003.mp4</pathurl>"));
        assert!(xml.contains("<clipitem id=\"clipitem-3\">"));
        assert!(xml.contains("<file id=\"file-3\"/>"));
    }

    #[test]
    fn test_unknown_extension_defaults_by_kind() {
        let layout = TimelineLayout::new(vec![
            item("v", TimelineItemKind::Video, 5.0, Some("stream.m3u8")),
            item("i", TimelineItemKind::Image, 2.0, None),
        ]);
        let xml = build_fcp_xml(layout.items(), layout.boundaries(), "Demo", 30);
        assert!(xml.contains("<name>001.mp4</name>"));
        assert!(xml.contains("<name>002.jpg</name>"));
    }

    #[test]
    fn test_name_escaping_everywhere() {
        let layout = scenario_a();
        let xml = build_fcp_xml(layout.items(), layout.boundaries(), "My <Project> & \"Co\"", 30);
        assert!(!xml.contains("My <Project>"));
        let escaped = "My &lt;Project&gt; &amp; &quot;Co&quot;";
        // Project name, bin name, and sequence name all carry the escape.
        assert_eq!(xml.matches(escaped).count(), 3);
    }

    #[test]
    fn test_deterministic_output() {
        let layout = scenario_a();
        let first = build_fcp_xml(layout.items(), layout.boundaries(), "Demo", 30);
        let second = build_fcp_xml(layout.items(), layout.boundaries(), "Demo", 30);
        assert_eq!(first, second);
    }

    #[test]
    fn test_document_skeleton() {
        let layout = scenario_a();
        let xml = build_fcp_xml(layout.items(), layout.boundaries(), "Demo", 30);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE xmeml>\n<xmeml version=\"4\">"));
        assert!(xml.ends_with("</xmeml>"));
        assert!(xml.contains("<sequence id=\"sequence-1\">"));
        assert!(xml.contains("<numOutputChannels>2</numOutputChannels>"));
        // Audio track is always present and always empty.
        assert!(xml.contains("<track/>"));
        assert!(xml.contains("<rate><timebase>30</timebase><ntsc>FALSE</ntsc></rate>"));
    }
}
