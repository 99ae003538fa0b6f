use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{CineError, CineResult};
use crate::render::backend::FrameRGBA;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Sequence description given to a [`Packager`] before the first frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub frame_count: u64,
    /// Digits used for zero-padded frame numbers.
    pub pad_width: usize,
}

/// One captured frame held in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct PackagedFrame {
    pub index: FrameIndex,
    pub name: String,
    pub frame: FrameRGBA,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArchiveContents {
    Memory(Vec<PackagedFrame>),
    /// Finalized directory of PNG files.
    Directory(PathBuf),
}

/// Finalized output of an export.
#[derive(Clone, Debug, PartialEq)]
pub struct Archive {
    pub info: PackageInfo,
    /// Entry names in frame order.
    pub names: Vec<String>,
    pub contents: ArchiveContents,
}

impl Archive {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// In-memory frames, if this archive holds them.
    pub fn frames(&self) -> Option<&[PackagedFrame]> {
        match &self.contents {
            ArchiveContents::Memory(frames) => Some(frames),
            ArchiveContents::Directory(_) => None,
        }
    }

    /// Output directory, if this archive was written to disk.
    pub fn dir(&self) -> Option<&Path> {
        match &self.contents {
            ArchiveContents::Memory(_) => None,
            ArchiveContents::Directory(p) => Some(p),
        }
    }
}

/// Packaging collaborator.
///
/// Ordering contract: `add_frame` is called once per frame in strictly increasing index order
/// between `begin` and `finalize`. `abort` discards everything added since `begin`.
pub trait Packager: Send {
    fn begin(&mut self, info: PackageInfo) -> CineResult<()>;
    fn add_frame(&mut self, idx: FrameIndex, name: &str, frame: &FrameRGBA) -> CineResult<()>;
    fn finalize(&mut self) -> CineResult<Archive>;
    fn abort(&mut self);
}

/// Packager keeping frames in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryPackager {
    info: Option<PackageInfo>,
    frames: Vec<PackagedFrame>,
    aborted: bool,
}

impl InMemoryPackager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence info captured in `begin`, if any.
    pub fn info(&self) -> Option<&PackageInfo> {
        self.info.as_ref()
    }

    /// Frames added since `begin` and not yet finalized.
    pub fn pending(&self) -> &[PackagedFrame] {
        &self.frames
    }

    /// `true` once `abort` ran.
    pub fn aborted(&self) -> bool {
        self.aborted
    }
}

impl Packager for InMemoryPackager {
    fn begin(&mut self, info: PackageInfo) -> CineResult<()> {
        self.frames.clear();
        self.frames.reserve(info.frame_count.min(4096) as usize);
        self.info = Some(info);
        self.aborted = false;
        Ok(())
    }

    fn add_frame(&mut self, idx: FrameIndex, name: &str, frame: &FrameRGBA) -> CineResult<()> {
        if self.info.is_none() {
            return Err(CineError::collaborator("add_frame before begin"));
        }
        let expected = self.frames.len() as u64;
        if idx.0 != expected {
            return Err(CineError::collaborator(format!(
                "frame {} out of order, expected {expected}",
                idx.0
            )));
        }
        self.frames.push(PackagedFrame {
            index: idx,
            name: name.to_owned(),
            frame: frame.clone(),
        });
        Ok(())
    }

    fn finalize(&mut self) -> CineResult<Archive> {
        let info = self
            .info
            .take()
            .ok_or_else(|| CineError::collaborator("finalize before begin"))?;
        let frames = std::mem::take(&mut self.frames);
        Ok(Archive {
            info,
            names: frames.iter().map(|f| f.name.clone()).collect(),
            contents: ArchiveContents::Memory(frames),
        })
    }

    fn abort(&mut self) {
        self.info = None;
        self.frames.clear();
        self.aborted = true;
    }
}

/// Options for [`PngDirPackager`].
#[derive(Clone, Debug)]
pub struct PngDirOpts {
    /// Final output directory.
    pub out_dir: PathBuf,
    /// Replace an existing output directory on finalize.
    pub overwrite: bool,
    /// Write `manifest.json` next to the frames.
    pub manifest: bool,
}

impl PngDirOpts {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            overwrite: true,
            manifest: true,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    info: &'a PackageInfo,
    frames: &'a [String],
}

/// Writes straight-alpha PNG files into a staging directory that is renamed into place on
/// finalize and removed on abort.
#[derive(Debug)]
pub struct PngDirPackager {
    opts: PngDirOpts,
    staging: Option<PathBuf>,
    info: Option<PackageInfo>,
    names: Vec<String>,
}

impl PngDirPackager {
    pub fn new(opts: PngDirOpts) -> Self {
        Self {
            opts,
            staging: None,
            info: None,
            names: Vec::new(),
        }
    }

    fn staging_path(&self) -> PathBuf {
        let name = self
            .opts
            .out_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frames".to_owned());
        self.opts
            .out_dir
            .with_file_name(format!(".{name}.partial"))
    }

    /// Write the manifest and swap the staging directory into place. A previous output is
    /// restored if the swap fails.
    fn publish(&self, staging: &Path, info: &PackageInfo) -> CineResult<()> {
        if self.opts.manifest {
            let path = staging.join("manifest.json");
            let json = serde_json::to_vec_pretty(&Manifest {
                info,
                frames: &self.names,
            })
            .map_err(|e| CineError::serde(format!("serialize manifest: {e}")))?;
            std::fs::write(&path, json).map_err(|e| io_err("write manifest", &path, e))?;
        }

        let out = &self.opts.out_dir;
        let backup = self.backup_path();
        let had_previous = out.symlink_metadata().is_ok();
        if had_previous {
            remove_path(&backup).map_err(|e| io_err("clear backup", &backup, e))?;
            std::fs::rename(out, &backup).map_err(|e| io_err("set aside output", out, e))?;
        }
        if let Err(e) = std::fs::rename(staging, out) {
            if had_previous && let Err(restore) = std::fs::rename(&backup, out) {
                tracing::warn!(out = %out.display(), "failed to restore previous output: {restore}");
            }
            return Err(io_err("move staging dir to", out, e));
        }
        if had_previous && let Err(e) = remove_path(&backup) {
            tracing::warn!(backup = %backup.display(), "failed to remove previous output: {e}");
        }
        Ok(())
    }

    fn backup_path(&self) -> PathBuf {
        self.staging_path().with_extension("previous")
    }
}

/// Remove a file or directory tree; a missing path is not an error.
fn remove_path(path: &Path) -> std::io::Result<()> {
    match path.symlink_metadata() {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn io_err(what: &str, path: &Path, e: impl std::fmt::Display) -> CineError {
    CineError::collaborator(format!("{what} '{}': {e}", path.display()))
}

impl Packager for PngDirPackager {
    #[tracing::instrument(skip(self), fields(out = %self.opts.out_dir.display()))]
    fn begin(&mut self, info: PackageInfo) -> CineResult<()> {
        if !self.opts.overwrite && self.opts.out_dir.exists() {
            return Err(io_err(
                "refusing to overwrite",
                &self.opts.out_dir,
                "directory exists",
            ));
        }
        let staging = self.staging_path();
        if staging.exists() {
            std::fs::remove_dir_all(&staging)
                .map_err(|e| io_err("clear staging dir", &staging, e))?;
        }
        std::fs::create_dir_all(&staging).map_err(|e| io_err("create staging dir", &staging, e))?;
        tracing::debug!(staging = %staging.display(), "staging directory created");
        self.staging = Some(staging);
        self.info = Some(info);
        self.names.clear();
        Ok(())
    }

    fn add_frame(&mut self, idx: FrameIndex, name: &str, frame: &FrameRGBA) -> CineResult<()> {
        let staging = self
            .staging
            .as_ref()
            .ok_or_else(|| CineError::collaborator("add_frame before begin"))?;
        let path = staging.join(name);
        let data = frame.to_straight_rgba8();
        image::save_buffer_with_format(
            &path,
            &data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| io_err("write png", &path, e))?;
        tracing::trace!(frame = idx.0, "png written");
        self.names.push(name.to_owned());
        Ok(())
    }

    fn finalize(&mut self) -> CineResult<Archive> {
        let staging = self
            .staging
            .clone()
            .ok_or_else(|| CineError::collaborator("finalize before begin"))?;
        let info = self
            .info
            .clone()
            .ok_or_else(|| CineError::collaborator("finalize before begin"))?;

        if let Err(e) = self.publish(&staging, &info) {
            self.abort();
            return Err(e);
        }

        self.staging = None;
        self.info = None;
        let names = std::mem::take(&mut self.names);
        Ok(Archive {
            info,
            names,
            contents: ArchiveContents::Directory(self.opts.out_dir.clone()),
        })
    }

    fn abort(&mut self) {
        self.info = None;
        self.names.clear();
        if let Some(staging) = self.staging.take()
            && let Err(e) = std::fs::remove_dir_all(&staging)
        {
            tracing::warn!(staging = %staging.display(), "failed to remove staging dir: {e}");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/packager.rs"]
mod tests;
