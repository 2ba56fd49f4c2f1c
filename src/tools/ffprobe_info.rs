use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

/// Format and video stream details needed to plan a contact sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaMetadata {
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub format_name: Option<String>,
    pub video_stream: usize,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub display_aspect_ratio: Option<String>,
}

/// Reads metadata from a media file.
pub trait MediaProber {
    /// `video_stream` picks a stream when the file has more than one.
    fn probe(&self, path: &Path, video_stream: Option<usize>) -> Result<MediaMetadata>;
}

/// [`MediaProber`] backed by the `ffprobe` executable.
#[derive(Debug, Clone, Default)]
pub struct FfprobeProber;

impl MediaProber for FfprobeProber {
    fn probe(&self, path: &Path, video_stream: Option<usize>) -> Result<MediaMetadata> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .with_context(|| format!("Failed to run ffprobe: {}", path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("ffprobe failed: {}", stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let metadata = parse_probe_output(&stdout, video_stream)
            .with_context(|| format!("Failed to read media metadata: {}", path.display()))?;
        debug!("Probed {}: {metadata:?}", path.display());
        Ok(metadata)
    }
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    start_time: Option<String>,
    duration: Option<String>,
    format_name: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    index: usize,
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    display_aspect_ratio: Option<String>,
}

/// Parse `ffprobe -print_format json -show_format -show_streams` output.
pub fn parse_probe_output(json: &str, video_stream: Option<usize>) -> Result<MediaMetadata> {
    let probe: FfprobeOutput =
        serde_json::from_str(json).context("Failed to parse ffprobe output")?;

    let streams = probe.streams.unwrap_or_default();
    let stream = find_video_stream(&streams, video_stream)?;

    let format = probe.format.as_ref();
    let number = |value: Option<&String>| value.and_then(|v| v.parse::<f64>().ok());

    Ok(MediaMetadata {
        start_time: number(format.and_then(|f| f.start_time.as_ref())),
        duration: number(format.and_then(|f| f.duration.as_ref())),
        format_name: format.and_then(|f| f.format_name.clone()),
        video_stream: stream.index,
        width: stream.width,
        height: stream.height,
        display_aspect_ratio: stream.display_aspect_ratio.clone(),
    })
}

/// Streams are keyed by their own index; ffprobe does not promise to list them in order.
fn find_video_stream(streams: &[StreamInfo], requested: Option<usize>) -> Result<&StreamInfo> {
    let video: BTreeMap<usize, &StreamInfo> = streams
        .iter()
        .filter(|s| s.codec_type.as_deref() == Some("video"))
        .map(|s| (s.index, s))
        .collect();

    if let Some(index) = requested {
        return video.get(&index).copied().with_context(|| {
            format!("Requested video stream {index} not found, or is not a video stream")
        });
    }

    match video.len() {
        0 => bail!("No video streams found"),
        1 => Ok(video.values().next().copied().context("No video streams found")?),
        n => {
            let choices: Vec<String> = video.keys().map(ToString::to_string).collect();
            bail!(
                "One video stream expected, found {n}. Choose a stream from {}",
                choices.join(",")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = r#"{
        "streams": [
            {"index": 0, "codec_type": "audio"},
            {"index": 1, "codec_type": "video", "width": 1280, "height": 720,
             "display_aspect_ratio": "16:9"}
        ],
        "format": {"start_time": "1.400000", "duration": "72.999330", "format_name": "mpegts"}
    }"#;

    const DOUBLE: &str = r#"{
        "streams": [
            {"index": 2, "codec_type": "video", "width": 640, "height": 360},
            {"index": 0, "codec_type": "video", "width": 1920, "height": 1080}
        ],
        "format": {"duration": "10.0"}
    }"#;

    #[test]
    fn test_parse_single_stream() {
        let metadata = parse_probe_output(SINGLE, None).unwrap();
        assert_eq!(metadata.video_stream, 1);
        assert_eq!(metadata.width, Some(1280));
        assert_eq!(metadata.height, Some(720));
        assert_eq!(metadata.start_time, Some(1.4));
        assert_eq!(metadata.duration, Some(72.99933));
        assert_eq!(metadata.format_name.as_deref(), Some("mpegts"));
        assert_eq!(metadata.display_aspect_ratio.as_deref(), Some("16:9"));
    }

    #[test]
    fn test_ambiguous_streams() {
        let err = parse_probe_output(DOUBLE, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "One video stream expected, found 2. Choose a stream from 0,2"
        );
    }

    #[test]
    fn test_choose_stream() {
        let metadata = parse_probe_output(DOUBLE, Some(2)).unwrap();
        assert_eq!(metadata.width, Some(640));
        assert!(metadata.start_time.is_none());
    }

    #[test]
    fn test_requested_stream_missing() {
        let err = parse_probe_output(SINGLE, Some(0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Requested video stream 0 not found, or is not a video stream"
        );
    }

    #[test]
    fn test_no_video_streams() {
        let json = r#"{"streams": [{"index": 0, "codec_type": "audio"}], "format": {}}"#;
        let err = parse_probe_output(json, None).unwrap_err();
        assert_eq!(err.to_string(), "No video streams found");
    }
}
