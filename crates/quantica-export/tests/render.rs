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
use quantica_export::backend::{RenderBackend, render_with_fallback};
use quantica_export::error::ExportError;
use quantica_export::html::render_html;
use quantica_export::model::ReportModel;
use quantica_export::pdf::LocalPdfBackend;
use quantica_export::report_filename;
use quantica_export::styles::DocumentStyles;

fn scale_field(label: &str, dimension: &str) -> TherapyField {
    TherapyField {
        label: label.to_string(),
        field_type: FieldType::Scale1To10,
        dimension: dimension.to_string(),
        options: None,
    }
}

fn therapy(name: &str, fields: Vec<TherapyField>) -> Therapy {
    let mut evaluated_dimensions: Vec<String> = Vec::new();
    for field in &fields {
        if !evaluated_dimensions.contains(&field.dimension) {
            evaluated_dimensions.push(field.dimension.clone());
        }
    }
    Therapy {
        id: Uuid::new_v4(),
        name: name.to_string(),
        form_fields: fields,
        evaluated_dimensions,
        visualization: VisualizationType::Radar,
    }
}

fn session(therapy: &Therapy, date: &str, answers: &[(&str, f64)]) -> Session {
    Session {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        therapy_id: therapy.id,
        session_date: date.parse().unwrap(),
        results: answers
            .iter()
            .map(|(label, value)| (label.to_string(), serde_json::json!(value)))
            .collect(),
        general_notes: None,
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

fn full_model() -> ReportModel {
    let t = therapy(
        "Reiki",
        vec![
            scale_field("Nível de energia", "Energético"),
            scale_field("Equilíbrio emocional", "Emocional"),
            scale_field("Clareza mental", "Mental"),
            scale_field("Vitalidade física", "Físico"),
        ],
    );
    let sessions = vec![
        session(
            &t,
            "2026-03-08T14:00:00Z",
            &[
                ("Nível de energia", 8.0),
                ("Equilíbrio emocional", 4.0),
                ("Clareza mental", 6.0),
                ("Vitalidade física", 3.5),
            ],
        ),
        session(
            &t,
            "2026-03-01T14:00:00Z",
            &[
                ("Nível de energia", 6.0),
                ("Equilíbrio emocional", 3.0),
                ("Clareza mental", 5.0),
                ("Vitalidade física", 3.0),
            ],
        ),
    ];
    let therapies: HashMap<Uuid, Therapy> = [(t.id, t.clone())].into();
    let analysis = analyze(&sessions, &therapies).unwrap();
    build_report_model(&ReportInputs {
        patient_name: "Ana Clara Souza",
        therapist: &therapist(),
        analysis: Some(&analysis),
        sessions: &sessions,
        therapies: &therapies,
        generated_at: generated_at(),
    })
}

fn empty_model() -> ReportModel {
    build_report_model(&ReportInputs {
        patient_name: "Ana Clara Souza",
        therapist: &therapist(),
        analysis: None,
        sessions: &[],
        therapies: &HashMap::new(),
        generated_at: generated_at(),
    })
}

struct FailingBackend;

impl RenderBackend for FailingBackend {
    fn id(&self) -> &'static str {
        "failing"
    }

    fn render(
        &self,
        _report: &ReportModel,
        _styles: &DocumentStyles,
    ) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::BackendUnavailable {
            backend: "failing",
            reason: "converter not installed".to_string(),
        })
    }
}

#[test]
fn filename_replaces_spaces_and_stamps_date() {
    assert_eq!(
        report_filename("Ana Clara Souza", generated_at()),
        "Relatorio_Quantico_Ana_Clara_Souza_2026-03-15.pdf"
    );
}

#[test]
fn filename_trims_surrounding_whitespace() {
    assert_eq!(
        report_filename("  Ana Souza ", generated_at()),
        "Relatorio_Quantico_Ana_Souza_2026-03-15.pdf"
    );
}

#[test]
fn local_backend_produces_pdf_bytes() {
    let styles = DocumentStyles::default();
    let bytes = LocalPdfBackend.render(&full_model(), &styles).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn local_backend_renders_empty_history() {
    let styles = DocumentStyles::default();
    let bytes = LocalPdfBackend.render(&empty_model(), &styles).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn local_backend_renders_long_history() {
    let t = therapy(
        "Reiki",
        vec![
            scale_field("Nível de energia", "Energético"),
            scale_field("Equilíbrio emocional", "Emocional"),
        ],
    );
    let sessions: Vec<Session> = (0..40)
        .map(|i| {
            session(
                &t,
                &format!("2026-{:02}-{:02}T14:00:00Z", 1 + i / 28, 1 + i % 28),
                &[
                    ("Nível de energia", 4.0),
                    ("Equilíbrio emocional", 4.5),
                ],
            )
        })
        .collect();
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

    let styles = DocumentStyles::default();
    let bytes = LocalPdfBackend.render(&model, &styles).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn local_backend_paginates_many_critical_fields() {
    // Twelve critical dimensions force the two-column card layout onto
    // a continuation page.
    let fields: Vec<TherapyField> = (0..12)
        .map(|i| scale_field(&format!("Campo {i}"), &format!("Dimensão {i}")))
        .collect();
    let t = therapy("Terapia Integrada", fields);
    let answers: Vec<(String, f64)> = (0..12).map(|i| (format!("Campo {i}"), 3.0)).collect();
    let answer_refs: Vec<(&str, f64)> =
        answers.iter().map(|(l, v)| (l.as_str(), *v)).collect();
    let sessions = vec![session(&t, "2026-03-01T14:00:00Z", &answer_refs)];
    let therapies: HashMap<Uuid, Therapy> = [(t.id, t.clone())].into();
    let analysis = analyze(&sessions, &therapies).unwrap();
    assert_eq!(analysis.critical_fields.len(), 12);

    let model = build_report_model(&ReportInputs {
        patient_name: "Ana Clara Souza",
        therapist: &therapist(),
        analysis: Some(&analysis),
        sessions: &sessions,
        therapies: &therapies,
        generated_at: generated_at(),
    });

    let styles = DocumentStyles::default();
    let bytes = LocalPdfBackend.render(&model, &styles).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn fallback_kicks_in_when_primary_fails() {
    let styles = DocumentStyles::default();
    let rendered = render_with_fallback(
        &full_model(),
        &styles,
        &FailingBackend,
        &LocalPdfBackend,
    )
    .unwrap();

    assert!(rendered.degraded);
    assert_eq!(rendered.backend, "local-pdf");
    assert!(rendered.bytes.starts_with(b"%PDF"));
}

#[test]
fn both_backends_failing_reports_both_errors() {
    let styles = DocumentStyles::default();
    let err = render_with_fallback(
        &full_model(),
        &styles,
        &FailingBackend,
        &FailingBackend,
    )
    .unwrap_err();

    match err {
        ExportError::RenderFailed { primary, fallback } => {
            assert!(primary.contains("converter not installed"));
            assert!(fallback.contains("converter not installed"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn primary_success_is_not_degraded() {
    let styles = DocumentStyles::default();
    let rendered = render_with_fallback(
        &full_model(),
        &styles,
        &LocalPdfBackend,
        &FailingBackend,
    )
    .unwrap();

    assert!(!rendered.degraded);
    assert_eq!(rendered.backend, "local-pdf");
}

#[test]
fn html_template_renders_all_sections() {
    let styles = DocumentStyles::default();
    let html = render_html(&full_model(), &styles).unwrap();

    assert!(html.contains("Ana Clara Souza"));
    assert!(html.contains("Dra. Helena Martins"));
    assert!(html.contains("Resumo executivo"));
    assert!(html.contains("Índice por campo avaliado"));
    assert!(html.contains("Histórico de sessões"));
    assert!(html.contains("Campos críticos"));
    assert!(html.contains("Recomendações"));
    assert!(html.contains("Emitido em: 15/03/2026"));
}

#[test]
fn html_template_colors_cells_by_tier() {
    let styles = DocumentStyles::default();
    let html = render_html(&full_model(), &styles).unwrap();

    // Emocional averages 3.5 and Físico 3.3; both get critical styling.
    assert!(html.contains("tier-critical"));
    assert!(html.contains("#d92020"));
}

#[test]
fn html_template_handles_no_data_state() {
    let styles = DocumentStyles::default();
    let html = render_html(&empty_model(), &styles).unwrap();

    assert!(html.contains("Ana Clara Souza"));
    assert!(html.contains("Análise indisponível"));
    assert!(html.contains("Sem dados suficientes para análise."));
    assert!(!html.contains("Resumo executivo"));
}
