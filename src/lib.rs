//! # snapkeep
//!
//! A personal backup tool that snapshots files or directories into
//! timestamped archives and keeps a bounded number of versions per backup
//! name.
//!
//! ## Features
//!
//! - **Container formats**: plain copy, ZIP (deflate), TAR, TAR+gzip
//! - **Versioning**: second-resolution timestamps embedded in archive names
//! - **Retention**: the newest N versions per name survive, the rest are
//!   pruned after every create
//! - **Format-sniffing restore**: the archive name picks the codec; gzip
//!   framing is detected from the content
//!
//! ## Quick Start
//!
//! ```no_run
//! use snapkeep::backup::engine::BackupEngine;
//!
//! let engine = BackupEngine::builder().backup_dir("backups").build();
//! let record = engine.create(std::path::Path::new("notes.txt"), None)?;
//! println!("archived to {:?}", record.path);
//! # Ok::<(), snapkeep::backup::result_error::error::Error>(())
//! ```
//!
//! The engine is single-process and single-operation: concurrent creates
//! against one backup directory are not serialized and can leave more
//! versions than the retention count.

pub mod backup;
