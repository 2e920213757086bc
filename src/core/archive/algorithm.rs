//! Placement of a single source file into the archive.

use super::layout::ArchiveLayout;
use crate::core::config::ArchiveConfig;
use crate::core::filesystem::{FileSystem, LoggingFileSystem, RealFileSystem};
use crate::core::metadata::{ExifMetadataOracle, MetadataOracle};
use crate::core::paths;
use crate::error::SortError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sorts files from a source tree into an archive tree
pub struct ArchiveAlgorithm {
    layout: ArchiveLayout,
    source_root: PathBuf,
    oracle: Box<dyn MetadataOracle>,
    fs: Box<dyn FileSystem>,
}

impl ArchiveAlgorithm {
    pub fn new(
        source_root: impl Into<PathBuf>,
        archive_root: impl Into<PathBuf>,
        oracle: Box<dyn MetadataOracle>,
        fs: Box<dyn FileSystem>,
    ) -> Self {
        Self {
            layout: ArchiveLayout::new(archive_root),
            source_root: source_root.into(),
            oracle,
            fs,
        }
    }

    /// EXIF oracle plus the real or dry-run filesystem, depending on config
    pub fn from_config(config: &ArchiveConfig) -> Self {
        let fs: Box<dyn FileSystem> = if config.dry_run {
            Box::new(LoggingFileSystem::new())
        } else {
            Box::new(RealFileSystem::new())
        };
        Self::new(
            config.source_root.clone(),
            config.archive_root.clone(),
            Box::new(ExifMetadataOracle::new()),
            fs,
        )
    }

    pub fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Create the `all/` and `origin/` index directories.
    ///
    /// Must run once before the first `sort` into a fresh archive.
    pub fn init(&self) -> Result<(), SortError> {
        self.fs
            .ensure_directory(&self.layout.all_dir())
            .map_err(SortError::Init)?;
        self.fs
            .ensure_directory(&self.layout.origin_dir())
            .map_err(SortError::Init)?;
        Ok(())
    }

    /// Archive `source` and return the path of its canonical copy.
    ///
    /// Returns [`SortError::NotMediaFile`] without touching the archive
    /// when the file is not a photo or video.
    pub fn sort(&self, source: &Path) -> Result<PathBuf, SortError> {
        let is_media = self
            .oracle
            .is_media_file(source)
            .map_err(SortError::MediaType)?;
        if !is_media {
            return Err(SortError::NotMediaFile {
                path: source.to_path_buf(),
            });
        }

        let captured = self
            .oracle
            .capture_date(source)
            .map_err(SortError::CaptureDate)?;

        // Checked up front so a foreign path never leaves a half-indexed file behind
        if paths::relative_within(&self.source_root, source).is_none() {
            return Err(SortError::OutsideSourceRoot {
                path: source.to_path_buf(),
                source_root: self.source_root.clone(),
            });
        }

        let target_dir = self.layout.calendar_dir(&captured);
        self.fs
            .ensure_directory(&target_dir)
            .map_err(SortError::TargetDirectory)?;

        let temp_path = self.layout.temp_file(&target_dir);
        let digest = self
            .fs
            .copy_with_digest(source, &temp_path)
            .map_err(|e| SortError::Copy {
                temp_path: temp_path.clone(),
                source: e,
            })?;

        let file_name = ArchiveLayout::canonical_file_name(&captured, &digest, source);
        let canonical = target_dir.join(&file_name);
        self.fs
            .rename(&temp_path, &canonical)
            .map_err(|e| SortError::Rename {
                temp_path: temp_path.clone(),
                source: e,
            })?;
        debug!(
            source = %source.display(),
            canonical = %canonical.display(),
            "stored canonical copy"
        );

        let all_link = self.layout.all_link(&file_name);
        let origin_link = self
            .layout
            .origin_link(&self.source_root, source, &file_name)
            .ok_or_else(|| SortError::OutsideSourceRoot {
                path: source.to_path_buf(),
                source_root: self.source_root.clone(),
            })?;

        self.fs
            .create_links(&[all_link.as_path(), origin_link.as_path()], &canonical)
            .map_err(|e| SortError::Link {
                canonical: canonical.clone(),
                source: e,
            })?;

        info!("{} --> {}", source.display(), canonical.display());
        Ok(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filesystem::{ContentDigest, FsOperation};
    use crate::error::{FileSystemError, MetadataError};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Oracle that treats every `.txt` file as non-media and dates the rest
    struct FixedOracle {
        captured: Option<NaiveDateTime>,
    }

    impl MetadataOracle for FixedOracle {
        fn is_media_file(&self, path: &Path) -> Result<bool, MetadataError> {
            Ok(path.extension().map_or(true, |e| e != "txt"))
        }

        fn capture_date(&self, path: &Path) -> Result<NaiveDateTime, MetadataError> {
            self.captured.ok_or_else(|| MetadataError::NoCaptureDate {
                path: path.to_path_buf(),
                reason: "no exif".to_string(),
            })
        }
    }

    fn april_17() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 4, 17)
            .unwrap()
            .and_hms_opt(13, 30, 44)
            .unwrap()
    }

    fn algorithm(source: &Path, archive: &Path) -> ArchiveAlgorithm {
        ArchiveAlgorithm::new(
            source,
            archive,
            Box::new(FixedOracle {
                captured: Some(april_17()),
            }),
            Box::new(RealFileSystem::new()),
        )
    }

    #[test]
    fn init_creates_index_directories() {
        let src = TempDir::new().unwrap();
        let archive = TempDir::new().unwrap();
        algorithm(src.path(), archive.path()).init().unwrap();

        assert!(archive.path().join("all").is_dir());
        assert!(archive.path().join("origin").is_dir());
    }

    #[test]
    fn sort_places_canonical_file_and_links() {
        let src = TempDir::new().unwrap();
        let archive = TempDir::new().unwrap();
        let album = src.path().join("holiday");
        fs::create_dir_all(&album).unwrap();
        let photo = album.join("IMG_0001.jpg");
        fs::write(&photo, b"jpeg bytes").unwrap();

        let algo = algorithm(src.path(), archive.path());
        algo.init().unwrap();
        let canonical = algo.sort(&photo).unwrap();

        let name = canonical.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("20190417_133044_"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(canonical.parent().unwrap(), archive.path().join("2019/04"));
        assert_eq!(fs::read(&canonical).unwrap(), b"jpeg bytes");
        assert!(archive.path().join("all").join(&name).exists());
        assert!(archive.path().join("origin/holiday").join(&name).exists());
        assert!(!archive.path().join("2019/04/photo-archive.tmp").exists());
        assert!(photo.exists());
    }

    #[test]
    fn sort_is_idempotent() {
        let src = TempDir::new().unwrap();
        let archive = TempDir::new().unwrap();
        let photo = src.path().join("a.jpg");
        fs::write(&photo, b"same bytes").unwrap();

        let algo = algorithm(src.path(), archive.path());
        algo.init().unwrap();
        let first = algo.sort(&photo).unwrap();
        let second = algo.sort(&photo).unwrap();

        assert_eq!(first, second);
        let entries = fs::read_dir(archive.path().join("2019/04")).unwrap().count();
        assert_eq!(entries, 1);
        assert_eq!(fs::read_dir(archive.path().join("all")).unwrap().count(), 1);
    }

    #[test]
    fn different_content_same_second_gets_different_names() {
        let src = TempDir::new().unwrap();
        let archive = TempDir::new().unwrap();
        let a = src.path().join("a.jpg");
        let b = src.path().join("b.jpg");
        fs::write(&a, b"first").unwrap();
        fs::write(&b, b"second").unwrap();

        let algo = algorithm(src.path(), archive.path());
        algo.init().unwrap();
        assert_ne!(algo.sort(&a).unwrap(), algo.sort(&b).unwrap());
    }

    #[test]
    fn non_media_file_is_skipped_without_side_effects() {
        let src = TempDir::new().unwrap();
        let archive = TempDir::new().unwrap();
        let notes = src.path().join("notes.txt");
        fs::write(&notes, b"not a photo").unwrap();

        let err = algorithm(src.path(), archive.path())
            .sort(&notes)
            .unwrap_err();

        assert!(err.is_skip());
        assert_eq!(fs::read_dir(archive.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_capture_date_is_hard_error() {
        let src = TempDir::new().unwrap();
        let archive = TempDir::new().unwrap();
        let photo = src.path().join("a.jpg");
        fs::write(&photo, b"bytes").unwrap();

        let algo = ArchiveAlgorithm::new(
            src.path(),
            archive.path(),
            Box::new(FixedOracle { captured: None }),
            Box::new(RealFileSystem::new()),
        );
        let err = algo.sort(&photo).unwrap_err();
        assert!(matches!(err, SortError::CaptureDate(_)));
    }

    #[test]
    fn source_outside_root_is_rejected_before_copy() {
        let src = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let archive = TempDir::new().unwrap();
        let photo = other.path().join("a.jpg");
        fs::write(&photo, b"bytes").unwrap();

        let err = algorithm(src.path(), archive.path())
            .sort(&photo)
            .unwrap_err();
        assert!(matches!(err, SortError::OutsideSourceRoot { .. }));
        assert!(!archive.path().join("2019").exists());
    }

    #[test]
    fn copy_failure_surfaces_temp_path() {
        let src = TempDir::new().unwrap();
        let archive = TempDir::new().unwrap();
        let missing = src.path().join("vanished.jpg");

        let err = algorithm(src.path(), archive.path())
            .sort(&missing)
            .unwrap_err();
        match err {
            SortError::Copy { temp_path, .. } => {
                assert_eq!(temp_path, archive.path().join("2019/04/photo-archive.tmp"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Real filesystem that refuses to create hard links
    struct NoLinkFileSystem(RealFileSystem);

    impl FileSystem for NoLinkFileSystem {
        fn ensure_absent(&self, path: &Path) -> Result<(), FileSystemError> {
            self.0.ensure_absent(path)
        }
        fn ensure_directory(&self, path: &Path) -> Result<(), FileSystemError> {
            self.0.ensure_directory(path)
        }
        fn hard_link(&self, target: &Path, link: &Path) -> Result<(), FileSystemError> {
            Err(FileSystemError::HardLink {
                target: target.to_path_buf(),
                link: link.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no links"),
            })
        }
        fn rename(&self, from: &Path, to: &Path) -> Result<(), FileSystemError> {
            self.0.rename(from, to)
        }
        fn copy_with_digest(
            &self,
            src: &Path,
            dst: &Path,
        ) -> Result<ContentDigest, FileSystemError> {
            self.0.copy_with_digest(src, dst)
        }
        fn file_size(&self, path: &Path) -> Result<u64, FileSystemError> {
            self.0.file_size(path)
        }
    }

    #[test]
    fn link_failure_keeps_canonical_file_and_resort_recovers() {
        let src = TempDir::new().unwrap();
        let archive = TempDir::new().unwrap();
        let photo = src.path().join("a.jpg");
        fs::write(&photo, b"bytes").unwrap();

        let algo = ArchiveAlgorithm::new(
            src.path(),
            archive.path(),
            Box::new(FixedOracle {
                captured: Some(april_17()),
            }),
            Box::new(NoLinkFileSystem(RealFileSystem::new())),
        );
        let err = algo.sort(&photo).unwrap_err();
        let canonical = match err {
            SortError::Link { canonical, .. } => canonical,
            other => panic!("unexpected error: {other}"),
        };
        assert!(canonical.exists());

        // Sorting again with working links completes the index
        let resorted = algorithm(src.path(), archive.path()).sort(&photo).unwrap();
        assert_eq!(resorted, canonical);

        let name = canonical.file_name().unwrap();
        let all_link = archive.path().join("all").join(name);
        let origin_link = archive.path().join("origin").join(name);
        assert!(all_link.is_file());
        assert!(origin_link.is_file());
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            let inode = fs::metadata(&canonical).unwrap().ino();
            assert_eq!(fs::metadata(&all_link).unwrap().ino(), inode);
            assert_eq!(fs::metadata(&origin_link).unwrap().ino(), inode);
        }
    }

    /// Shares the recorded operations of a dry-run filesystem with the test
    struct SharedDryRun(Arc<LoggingFileSystem>);

    impl FileSystem for SharedDryRun {
        fn ensure_absent(&self, path: &Path) -> Result<(), FileSystemError> {
            self.0.ensure_absent(path)
        }
        fn ensure_directory(&self, path: &Path) -> Result<(), FileSystemError> {
            self.0.ensure_directory(path)
        }
        fn hard_link(&self, target: &Path, link: &Path) -> Result<(), FileSystemError> {
            self.0.hard_link(target, link)
        }
        fn rename(&self, from: &Path, to: &Path) -> Result<(), FileSystemError> {
            self.0.rename(from, to)
        }
        fn copy_with_digest(
            &self,
            src: &Path,
            dst: &Path,
        ) -> Result<ContentDigest, FileSystemError> {
            self.0.copy_with_digest(src, dst)
        }
        fn file_size(&self, path: &Path) -> Result<u64, FileSystemError> {
            self.0.file_size(path)
        }
    }

    #[test]
    fn dry_run_reports_canonical_path_without_writing() {
        let src = TempDir::new().unwrap();
        let archive = TempDir::new().unwrap();
        let photo = src.path().join("a.jpg");
        fs::write(&photo, b"bytes").unwrap();

        let dry_run = Arc::new(LoggingFileSystem::new());
        let algo = ArchiveAlgorithm::new(
            src.path(),
            archive.path(),
            Box::new(FixedOracle {
                captured: Some(april_17()),
            }),
            Box::new(SharedDryRun(Arc::clone(&dry_run))),
        );
        let canonical = algo.sort(&photo).unwrap();

        assert!(!canonical.exists());
        assert_eq!(fs::read_dir(archive.path()).unwrap().count(), 0);
        let links = dry_run
            .operations()
            .into_iter()
            .filter(|op| matches!(op, FsOperation::HardLink { .. }))
            .count();
        assert_eq!(links, 2);
    }
}
