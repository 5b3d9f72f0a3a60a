use std::collections::HashMap;

use jiff::Timestamp;
use uuid::Uuid;

use quantica_analytics::engine::analyze;
use quantica_core::models::patient::Therapist;
use quantica_core::models::session::Session;
use quantica_core::models::therapy::{
    FieldType, Therapy, TherapyField, VisualizationType,
};
use quantica_export::assembler::{ReportInputs, build_report_model};
use quantica_export::docx::export_docx_summary;
use quantica_export::styles::DocumentStyles;

fn scale_field(label: &str, dimension: &str) -> TherapyField {
    TherapyField {
        label: label.to_string(),
        field_type: FieldType::Scale1To10,
        dimension: dimension.to_string(),
        options: None,
    }
}

fn therapist() -> Therapist {
    Therapist {
        full_name: "Dra. Helena Martins".to_string(),
        email: "helena@clinica.example".to_string(),
    }
}

fn generated_at() -> Timestamp {
    "2026-03-15T10:00:00Z".parse().unwrap()
}

#[test]
fn docx_summary_produces_zip_container() {
    let t = Therapy {
        id: Uuid::new_v4(),
        name: "Reiki".to_string(),
        form_fields: vec![
            scale_field("Nível de energia", "Energético"),
            scale_field("Equilíbrio emocional", "Emocional"),
        ],
        evaluated_dimensions: vec!["Energético".to_string(), "Emocional".to_string()],
        visualization: VisualizationType::Radar,
    };
    let sessions = vec![Session {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        therapy_id: t.id,
        session_date: "2026-03-01T14:00:00Z".parse().unwrap(),
        results: [
            ("Nível de energia".to_string(), serde_json::json!(7.0)),
            ("Equilíbrio emocional".to_string(), serde_json::json!(4.0)),
        ]
        .into(),
        general_notes: None,
    }];
    let therapies: HashMap<Uuid, Therapy> = [(t.id, t.clone())].into();
    let analysis = analyze(&sessions, &therapies).unwrap();
    let model = build_report_model(&ReportInputs {
        patient_name: "Ana Clara Souza",
        therapist: &therapist(),
        analysis: Some(&analysis),
        sessions: &sessions,
        therapies: &therapies,
        generated_at: generated_at(),
    });

    let bytes = export_docx_summary(&model, &DocumentStyles::default()).unwrap();
    // DOCX is a ZIP archive.
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn docx_summary_renders_no_data_state() {
    let model = build_report_model(&ReportInputs {
        patient_name: "Ana Clara Souza",
        therapist: &therapist(),
        analysis: None,
        sessions: &[],
        therapies: &HashMap::new(),
        generated_at: generated_at(),
    });

    let bytes = export_docx_summary(&model, &DocumentStyles::default()).unwrap();
    assert!(bytes.starts_with(b"PK"));
}
