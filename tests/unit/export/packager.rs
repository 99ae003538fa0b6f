use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "cinescene_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn info(frames: u64) -> PackageInfo {
    PackageInfo {
        width: 2,
        height: 1,
        fps: Fps::new(30, 1).unwrap(),
        frame_count: frames,
        pad_width: 5,
    }
}

fn frame(r: u8) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![r, 0, 0, 255, 64, 0, 0, 128],
        premultiplied: true,
    }
}

#[test]
fn in_memory_collects_frames_in_order() {
    let mut p = InMemoryPackager::new();
    p.begin(info(2)).unwrap();
    p.add_frame(FrameIndex(0), "frame_00000.png", &frame(1)).unwrap();
    p.add_frame(FrameIndex(1), "frame_00001.png", &frame(2)).unwrap();
    let archive = p.finalize().unwrap();
    assert_eq!(archive.len(), 2);
    assert_eq!(archive.names, vec!["frame_00000.png", "frame_00001.png"]);
    let frames = archive.frames().unwrap();
    assert_eq!(frames[1].frame, frame(2));
    assert!(archive.dir().is_none());
}

#[test]
fn in_memory_rejects_gaps_and_missing_begin() {
    let mut p = InMemoryPackager::new();
    assert!(p.add_frame(FrameIndex(0), "a", &frame(0)).is_err());
    assert!(p.finalize().is_err());

    p.begin(info(3)).unwrap();
    let err = p.add_frame(FrameIndex(1), "b", &frame(0)).unwrap_err();
    assert!(matches!(err, CineError::RenderCollaborator(_)));
}

#[test]
fn in_memory_abort_discards() {
    let mut p = InMemoryPackager::new();
    p.begin(info(2)).unwrap();
    p.add_frame(FrameIndex(0), "a", &frame(0)).unwrap();
    p.abort();
    assert!(p.aborted());
    assert!(p.pending().is_empty());
    assert!(p.finalize().is_err());
}

#[test]
fn png_dir_finalize_moves_staging_into_place() {
    let root = temp_dir("png_finalize");
    let out = root.join("frames");
    let mut p = PngDirPackager::new(PngDirOpts::new(&out));
    p.begin(info(1)).unwrap();
    p.add_frame(FrameIndex(0), "frame_00000.png", &frame(200)).unwrap();
    assert!(!out.exists());

    let archive = p.finalize().unwrap();
    assert_eq!(archive.dir(), Some(out.as_path()));
    assert!(!root.join(".frames.partial").exists());

    let img = image::open(out.join("frame_00000.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    // Stored straight: 64 premultiplied at alpha 128 is 128.
    assert_eq!(img.get_pixel(1, 0).0, [128, 0, 0, 128]);

    let manifest: serde_json::Value =
        serde_json::from_slice(&std::fs::read(out.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest["info"]["frameCount"], 1);
    assert_eq!(manifest["frames"][0], "frame_00000.png");

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn png_dir_abort_removes_staging() {
    let root = temp_dir("png_abort");
    let out = root.join("frames");
    let mut p = PngDirPackager::new(PngDirOpts::new(&out));
    p.begin(info(2)).unwrap();
    p.add_frame(FrameIndex(0), "frame_00000.png", &frame(1)).unwrap();
    p.abort();
    assert!(!out.exists());
    assert!(!root.join(".frames.partial").exists());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn png_dir_respects_no_overwrite() {
    let root = temp_dir("png_no_overwrite");
    let out = root.join("frames");
    std::fs::create_dir_all(&out).unwrap();
    let mut p = PngDirPackager::new(PngDirOpts {
        overwrite: false,
        ..PngDirOpts::new(&out)
    });
    assert!(p.begin(info(1)).is_err());
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn png_dir_finalize_failure_cleans_staging_and_keeps_previous_output() {
    let root = temp_dir("png_finalize_fail");
    let out = root.join("frames");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("old.txt"), b"previous run").unwrap();

    let mut p = PngDirPackager::new(PngDirOpts::new(&out));
    p.begin(info(1)).unwrap();
    p.add_frame(FrameIndex(0), "frame_00000.png", &frame(9)).unwrap();
    // A directory where the manifest should go makes the manifest write fail.
    std::fs::create_dir(root.join(".frames.partial").join("manifest.json")).unwrap();

    let err = p.finalize().unwrap_err();
    assert!(matches!(err, CineError::RenderCollaborator(_)));
    assert!(!root.join(".frames.partial").exists());
    assert!(!root.join(".frames.previous").exists());
    assert_eq!(std::fs::read(out.join("old.txt")).unwrap(), b"previous run");
    assert!(p.finalize().is_err());

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn png_dir_replaces_existing_file_at_output_path() {
    let root = temp_dir("png_replace_file");
    let out = root.join("frames");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(&out, b"not a directory").unwrap();

    let mut p = PngDirPackager::new(PngDirOpts::new(&out));
    p.begin(info(1)).unwrap();
    p.add_frame(FrameIndex(0), "frame_00000.png", &frame(3)).unwrap();
    p.finalize().unwrap();

    assert!(out.is_dir());
    assert!(out.join("frame_00000.png").exists());
    assert!(!root.join(".frames.partial").exists());
    assert!(!root.join(".frames.previous").exists());

    std::fs::remove_dir_all(&root).unwrap();
}
