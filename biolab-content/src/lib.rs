//! # BioLab Content
//!
//! Typed material collections for the BioLab education platform: labs,
//! STEAM projects, and the teacher/student material libraries, all backed
//! by the hosted table store, plus the file-storage seam their attachments
//! go through.
//!
//! Pairs with `biolab-auth`: sign in there, then hand the access token to
//! [`ContentClient::set_bearer`] so the hosted row policies see the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use biolab_content::{ContentClient, NewLab};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ContentClient::new("https://project.example.co", "anon-key")?;
//!
//!     let labs = client.labs().list().await?;
//!     println!("{} labs published", labs.len());
//!
//!     client.set_bearer(Some("user-access-token".into()));
//!     let created = client
//!         .labs()
//!         .create(&NewLab {
//!             title: "Osmosis".into(),
//!             description: "Observing osmosis in plant cells".into(),
//!             class_level: Some(8),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("created lab {}", created.id);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod rest;
pub mod storage;
pub mod types;

// Re-exports for convenience
pub use error::{ContentError, Result};
pub use rest::ContentClient;
pub use storage::{FileStorage, MemoryFileStorage, RestFileStorage};
pub use types::{
    Lab, NewLab, NewSteamProject, NewStudentMaterial, NewTeacherMaterial, SteamProject,
    StudentMaterial, TeacherMaterial,
};
