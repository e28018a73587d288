use super::*;
use crate::config::TtsVoice;
use crate::models::VideoDimensions;
use crate::services::mock::{CannedSpeech, RecordingTool, write_wav};
use crate::services::video::is_target_aspect;
use chrono::{DateTime, Local, TimeZone};
use std::path::PathBuf;

fn fixed_clock() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
}

fn pipeline(
    dir: &Path,
    tool: Arc<RecordingTool>,
    speech: Arc<CannedSpeech>,
    naming: FileNaming,
) -> MediaPipeline {
    MediaPipeline::new(
        tool,
        speech,
        MediaStore::with_clock(dir.join("media"), naming, fixed_clock),
        TtsModel::Standard,
    )
}

fn simple(dir: &Path, tool: Arc<RecordingTool>) -> MediaPipeline {
    pipeline(dir, tool, Arc::new(CannedSpeech::new(b"ID3")), FileNaming::Timestamp)
}

#[tokio::test]
async fn test_vertical_upload_is_returned_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(RecordingTool::new(1080, 1920));
    let pipeline = simple(dir.path(), tool.clone());

    let asset = pipeline.ingest_video(Some("clip.mp4"), b"video-bytes").await.unwrap();

    assert_eq!(asset.role, AssetRole::Original);
    assert_eq!(asset.path, dir.path().join("media/video_20240309_140507.mp4"));
    assert_eq!(std::fs::read(&asset.path).unwrap(), b"video-bytes");
    assert!(tool.jobs().is_empty(), "no crop expected");
}

#[tokio::test]
async fn test_landscape_upload_is_cropped() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(RecordingTool::new(1920, 1080));
    let pipeline = simple(dir.path(), tool.clone());

    let asset = pipeline.ingest_video(Some("clip.mp4"), b"video-bytes").await.unwrap();

    assert_eq!(asset.role, AssetRole::Cropped);
    assert_eq!(asset.path, dir.path().join("media/video_20240309_140507_cropped.mp4"));
    assert!(asset.path.exists());

    let jobs = tool.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].inputs, vec![dir.path().join("media/video_20240309_140507.mp4")]);
    assert_eq!(jobs[0].video_filter.as_deref(), Some("crop=608:1080"));

    let cropped = tool.probe(&asset.path).await.unwrap();
    assert_eq!(cropped.height, 1080);
    assert!((cropped.width as f64 - 1080.0 * 9.0 / 16.0).abs() <= 1.0);
    assert!(is_target_aspect(cropped));
}

#[tokio::test]
async fn test_off_ratio_uploads_always_crop_onto_target() {
    for (w, h) in [(1280, 720), (1000, 1000), (480, 640), (300, 1000), (40, 30), (140, 134)] {
        let dir = tempfile::tempdir().unwrap();
        let tool = Arc::new(RecordingTool::new(w, h));
        let pipeline = simple(dir.path(), tool.clone());

        let asset = pipeline.ingest_video(None, b"v").await.unwrap();
        assert_eq!(asset.role, AssetRole::Cropped, "{}x{}", w, h);

        let dims = tool.probe(&asset.path).await.unwrap();
        assert!(is_target_aspect(dims), "{}x{} cropped to {:?}", w, h, dims);
    }
}

#[tokio::test]
async fn test_near_vertical_upload_within_tolerance_is_not_cropped() {
    let dir = tempfile::tempdir().unwrap();
    // 0.5667, inside the 0.01 band around 0.5625
    let tool = Arc::new(RecordingTool::new(1088, 1920));
    let pipeline = simple(dir.path(), tool.clone());

    let asset = pipeline.ingest_video(None, b"v").await.unwrap();
    assert_eq!(asset.role, AssetRole::Original);
    assert!(tool.jobs().is_empty());
}

#[tokio::test]
async fn test_frame_too_small_to_crop_is_upload_error() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(RecordingTool::new(1, 1));
    let pipeline = simple(dir.path(), tool.clone());

    let err = pipeline.ingest_video(None, b"v").await.unwrap_err();
    assert!(matches!(err, PipelineError::Upload(AppError::InvalidInput(_))), "{:?}", err);
    assert!(tool.jobs().is_empty());
}

#[tokio::test]
async fn test_crop_failure_is_upload_error() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(RecordingTool::failing(1920, 1080, "Invalid data found when processing input"));
    let pipeline = simple(dir.path(), tool);

    let err = pipeline.ingest_video(None, b"v").await.unwrap_err();
    assert!(matches!(err, PipelineError::Upload(AppError::MediaTool(_))), "{:?}", err);
}

#[tokio::test]
async fn test_missing_crop_output_is_upload_error() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(RecordingTool::silent(1920, 1080));
    let pipeline = simple(dir.path(), tool);

    let err = pipeline.ingest_video(None, b"v").await.unwrap_err();
    assert!(matches!(err, PipelineError::Upload(_)));
}

#[tokio::test]
async fn test_empty_upload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(RecordingTool::new(1080, 1920));
    let pipeline = simple(dir.path(), tool.clone());

    let err = pipeline.ingest_video(Some("clip.mp4"), b"").await.unwrap_err();
    assert!(matches!(err, PipelineError::Upload(AppError::InvalidInput(_))));
    assert!(tool.probes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_same_second_uploads_share_a_path_and_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(RecordingTool::new(1080, 1920));
    let pipeline = simple(dir.path(), tool);

    let first = pipeline.ingest_video(Some("a.mp4"), b"first").await.unwrap();
    let second = pipeline.ingest_video(Some("b.mp4"), b"second").await.unwrap();

    // not deduplicated: the second write replaces the first
    assert_eq!(first.path, second.path);
    assert_eq!(std::fs::read(&second.path).unwrap(), b"second");
}

#[tokio::test]
async fn test_unique_naming_keeps_both_uploads() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(RecordingTool::new(1080, 1920));
    let pipeline = pipeline(dir.path(), tool, Arc::new(CannedSpeech::new(b"ID3")), FileNaming::Unique);

    let first = pipeline.ingest_video(Some("a.mp4"), b"first").await.unwrap();
    let second = pipeline.ingest_video(Some("b.mp4"), b"second").await.unwrap();

    assert_ne!(first.path, second.path);
    assert_eq!(std::fs::read(&first.path).unwrap(), b"first");
}

#[tokio::test]
async fn test_synthesis_names_file_after_text_and_voice() {
    let dir = tempfile::tempdir().unwrap();
    let speech = Arc::new(CannedSpeech::new(b"ID3audio"));
    let pipeline = pipeline(
        dir.path(),
        Arc::new(RecordingTool::new(1080, 1920)),
        speech.clone(),
        FileNaming::Timestamp,
    );

    let request = SynthesisRequest {
        text: "Hello world this is a test".to_string(),
        voice: TtsVoice::Nova,
    };
    let asset = pipeline.synthesize(&request).await.unwrap();

    assert_eq!(asset.role, AssetRole::Synthesized);
    let name = asset.path.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(name, "Hello_world_this_is_a_nova_20240309_140507.mp3");
    assert_eq!(std::fs::read(&asset.path).unwrap(), b"ID3audio");

    let requests = speech.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "Hello world this is a test");
    assert_eq!(requests[0].model, TtsModel::Standard);
}

#[tokio::test]
async fn test_synthesis_with_every_known_voice() {
    for voice in TtsVoice::KNOWN {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = simple(dir.path(), Arc::new(RecordingTool::new(1080, 1920)));

        let asset = pipeline
            .synthesize(&SynthesisRequest {
                text: "one two three four five six seven".to_string(),
                voice: voice.clone(),
            })
            .await
            .unwrap();

        let name = asset.path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(
            name.starts_with(&format!("one_two_three_four_five_{}_", voice.as_str())),
            "{}",
            name
        );
    }
}

#[tokio::test]
async fn test_unknown_voice_reaches_provider() {
    let dir = tempfile::tempdir().unwrap();
    let speech = Arc::new(CannedSpeech::failing("Invalid value for 'voice': robot"));
    let pipeline = pipeline(
        dir.path(),
        Arc::new(RecordingTool::new(1080, 1920)),
        speech.clone(),
        FileNaming::Timestamp,
    );

    let err = pipeline
        .synthesize(&SynthesisRequest {
            text: "Hi".to_string(),
            voice: TtsVoice::from("robot"),
        })
        .await
        .unwrap_err();

    assert_eq!(speech.requests.lock().unwrap()[0].voice.as_str(), "robot");
    match err {
        PipelineError::Synthesis(inner) => assert!(inner.to_string().contains("robot")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_text_never_calls_provider() {
    let dir = tempfile::tempdir().unwrap();
    let speech = Arc::new(CannedSpeech::new(b"ID3"));
    let pipeline = pipeline(
        dir.path(),
        Arc::new(RecordingTool::new(1080, 1920)),
        speech.clone(),
        FileNaming::Timestamp,
    );

    let err = pipeline
        .synthesize(&SynthesisRequest {
            text: "  \n ".to_string(),
            voice: TtsVoice::Alloy,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::InvalidInput(_)));
    assert!(speech.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_composition_is_bounded_by_audio_duration() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(RecordingTool::new(1080, 1920));
    let pipeline = simple(dir.path(), tool.clone());

    let video = dir.path().join("ten_seconds.mp4");
    std::fs::write(&video, b"video").unwrap();
    let audio = dir.path().join("three_seconds.wav");
    write_wav(&audio, 3.0);

    let asset = pipeline
        .compose(&CompositionRequest {
            video_path: video.clone(),
            audio_path: audio.clone(),
            start_time: 0.0,
        })
        .await
        .unwrap();

    assert_eq!(asset.role, AssetRole::Combined);
    assert_eq!(asset.path, dir.path().join("media/combined_20240309_140507.mp4"));
    assert!(asset.path.exists());

    let jobs = tool.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].inputs, vec![video, audio]);
    let duration = jobs[0].duration.unwrap();
    assert!((duration - 3.0).abs() < 0.01, "got {}", duration);
    assert!(jobs[0].options.windows(2).any(|w| w == ["-c:v", "copy"]));
}

#[tokio::test]
async fn test_start_time_does_not_change_trim() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(RecordingTool::new(1080, 1920));
    let pipeline = simple(dir.path(), tool.clone());

    let audio = dir.path().join("two_seconds.wav");
    write_wav(&audio, 2.0);

    pipeline
        .compose(&CompositionRequest {
            video_path: PathBuf::from("video.mp4"),
            audio_path: audio,
            start_time: 5.0,
        })
        .await
        .unwrap();

    let duration = tool.jobs()[0].duration.unwrap();
    assert!((duration - 2.0).abs() < 0.01);
}

#[tokio::test]
async fn test_undecodable_audio_is_composition_error() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(RecordingTool::new(1080, 1920));
    let pipeline = simple(dir.path(), tool.clone());

    let audio = dir.path().join("broken.mp3");
    std::fs::write(&audio, b"not audio at all").unwrap();

    let err = pipeline
        .compose(&CompositionRequest {
            video_path: PathBuf::from("video.mp4"),
            audio_path: audio,
            start_time: 0.0,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Composition(AppError::Decode(_))), "{:?}", err);
    assert!(tool.jobs().is_empty());
}

#[tokio::test]
async fn test_transcode_failure_is_composition_error() {
    let dir = tempfile::tempdir().unwrap();
    let tool = Arc::new(RecordingTool::failing(1080, 1920, "video.mp4: No such file or directory"));
    let pipeline = simple(dir.path(), tool);

    let audio = dir.path().join("one_second.wav");
    write_wav(&audio, 1.0);

    let err = pipeline
        .compose(&CompositionRequest {
            video_path: PathBuf::from("video.mp4"),
            audio_path: audio,
            start_time: 0.0,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Composition(AppError::MediaTool(_))));
}

#[test]
fn test_dimensions_helper() {
    assert!((VideoDimensions::new(1080, 1920).aspect_ratio() - 0.5625).abs() < 1e-9);
}
