//! Material records as stored in the hosted tables
//!
//! Timestamps stay RFC 3339 strings — the table store mints them and the
//! app only displays and sorts by them. `New*` inputs omit every
//! server-minted field.

use serde::{Deserialize, Serialize};

/// A laboratory work: theory, process steps, and attached media
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    pub id: String,
    pub title: String,
    pub description: String,
    pub theory: Option<String>,
    pub process: Option<String>,
    pub class_level: Option<i32>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub external_links: Option<Vec<String>>,
    pub files: Option<Vec<String>>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating or replacing a lab
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewLab {
    pub title: String,
    pub description: String,
    pub theory: Option<String>,
    pub process: Option<String>,
    pub class_level: Option<i32>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub external_links: Option<Vec<String>>,
    pub files: Option<Vec<String>>,
}

/// A STEAM project — same material shape as a lab, separate collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteamProject {
    pub id: String,
    pub title: String,
    pub description: String,
    pub theory: Option<String>,
    pub process: Option<String>,
    pub class_level: Option<i32>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub external_links: Option<Vec<String>>,
    pub files: Option<Vec<String>>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating or replacing a STEAM project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSteamProject {
    pub title: String,
    pub description: String,
    pub theory: Option<String>,
    pub process: Option<String>,
    pub class_level: Option<i32>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub external_links: Option<Vec<String>>,
    pub files: Option<Vec<String>>,
}

/// Methodical material addressed to teachers of a class level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherMaterial {
    pub id: String,
    pub title: String,
    pub description: String,
    pub theory: Option<String>,
    pub process: Option<String>,
    pub class_level: i32,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub external_links: Option<Vec<String>>,
    pub files: Option<Vec<String>>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating or replacing a teacher material
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTeacherMaterial {
    pub title: String,
    pub description: String,
    pub theory: Option<String>,
    pub process: Option<String>,
    pub class_level: i32,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub external_links: Option<Vec<String>>,
    pub files: Option<Vec<String>>,
}

/// Self-study material addressed to students of a class level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentMaterial {
    pub id: String,
    pub title: String,
    pub description: String,
    pub class_level: i32,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub external_links: Option<Vec<String>>,
    pub files: Option<Vec<String>>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating or replacing a student material
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewStudentMaterial {
    pub title: String,
    pub description: String,
    pub class_level: i32,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub external_links: Option<Vec<String>>,
    pub files: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lab_row_parsing() {
        // Row shape as the hosted table store returns it.
        let json = r#"{
            "id": "6f1c",
            "title": "Microscopy basics",
            "description": "Cells under magnification",
            "theory": "Optics primer",
            "process": "1. Prepare the slide",
            "class_level": 7,
            "image_url": null,
            "video_url": "https://video.example/m1",
            "external_links": ["https://ref.example"],
            "files": null,
            "created_at": "2026-01-15T08:30:00+00:00",
            "updated_at": "2026-01-15T08:30:00+00:00"
        }"#;

        let lab: Lab = serde_json::from_str(json).unwrap();
        assert_eq!(lab.id, "6f1c");
        assert_eq!(lab.class_level, Some(7));
        assert_eq!(lab.image_url, None);
        assert_eq!(lab.external_links.as_deref(), Some(&["https://ref.example".to_string()][..]));
    }

    #[test]
    fn test_new_lab_round_trip() {
        let new = NewLab {
            title: "Titration".into(),
            description: "Acid-base titration".into(),
            class_level: Some(9),
            ..Default::default()
        };
        let json = serde_json::to_string(&new).unwrap();
        let back: NewLab = serde_json::from_str(&json).unwrap();
        assert_eq!(back, new);
    }

    #[test]
    fn test_teacher_material_requires_class_level() {
        let json = r#"{
            "id": "m-1",
            "title": "Lesson plan",
            "description": "Grade 8 biology",
            "theory": null,
            "process": null,
            "class_level": 8,
            "image_url": null,
            "video_url": null,
            "external_links": null,
            "files": null,
            "created_at": "2026-02-01T10:00:00+00:00",
            "updated_at": "2026-02-01T10:00:00+00:00"
        }"#;
        let material: TeacherMaterial = serde_json::from_str(json).unwrap();
        assert_eq!(material.class_level, 8);

        let missing = r#"{
            "id": "m-2",
            "title": "x",
            "description": "y",
            "created_at": "2026-02-01T10:00:00+00:00",
            "updated_at": "2026-02-01T10:00:00+00:00"
        }"#;
        assert!(serde_json::from_str::<TeacherMaterial>(missing).is_err());
    }
}
