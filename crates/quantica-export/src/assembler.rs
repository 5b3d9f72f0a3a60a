//! The report data assembler: analysis + history in, [`ReportModel`]
//! out. Pure transformation — no pixels, no bytes — so rendering
//! backends can be swapped without touching aggregation logic.

use std::cmp::Ordering;
use std::collections::HashMap;

use jiff::Timestamp;
use uuid::Uuid;

use quantica_analytics::engine::AnalysisResult;
use quantica_analytics::normalize::session_mean;
use quantica_analytics::tiers::{Level, ScoreTier, TARGET_AVERAGE, ValueTier};
use quantica_core::models::patient::Therapist;
use quantica_core::models::session::Session;
use quantica_core::models::therapy::Therapy;

use crate::model::{
    CoverSection, CriticalCard, ExecutiveSummary, FieldRow, HistoryRow,
    RecommendationSection, ReportBody, ReportModel,
};

/// How many sessions the history table shows, most recent first.
pub const HISTORY_LIMIT: usize = 10;

pub struct ReportInputs<'a> {
    pub patient_name: &'a str,
    pub therapist: &'a Therapist,
    /// `None` when the patient has no sessions yet.
    pub analysis: Option<&'a AnalysisResult>,
    /// Most recent first.
    pub sessions: &'a [Session],
    pub therapies: &'a HashMap<Uuid, Therapy>,
    pub generated_at: Timestamp,
}

/// Build the report model in its fixed section order. Deterministic:
/// identical inputs produce structurally identical models.
pub fn build_report_model(inputs: &ReportInputs<'_>) -> ReportModel {
    let cover = CoverSection {
        patient_name: inputs.patient_name.to_string(),
        therapist_name: inputs.therapist.full_name.clone(),
        therapist_email: inputs.therapist.email.clone(),
        generated_on: inputs.generated_at.strftime("%d/%m/%Y").to_string(),
        overall_score: inputs.analysis.map(|a| a.overall_score),
    };

    let Some(analysis) = inputs.analysis else {
        return ReportModel { cover, body: None };
    };

    let tier = ScoreTier::from_score(analysis.overall_score);

    let summary = ExecutiveSummary {
        score: analysis.overall_score,
        tier,
        tier_label: tier.label().to_string(),
        interpretation: interpretation(tier),
        total_sessions: analysis.total_sessions,
        velocity_label: analysis.improvement_velocity.label().to_string(),
        critical_count: analysis.critical_fields.len() as u32,
    };

    let insights = insights(analysis, tier);

    let mut field_rows: Vec<FieldRow> = analysis
        .per_field_index
        .iter()
        .map(|entry| FieldRow {
            dimension: entry.dimension.clone(),
            average: entry.current_average,
            average_label: format!("{:.1}", entry.current_average),
            percentile: entry.percentile,
            level_label: entry.level.label().to_string(),
            tier: ValueTier::from_value(entry.current_average),
        })
        .collect();
    // Display-priority order: most critical dimensions first. The
    // engine's first-seen order stays untouched in `critical` below.
    field_rows.sort_by(|a, b| {
        a.average.partial_cmp(&b.average).unwrap_or(Ordering::Equal)
    });

    let history = inputs
        .sessions
        .iter()
        .take(HISTORY_LIMIT)
        .map(|session| {
            let mean = session_mean(session);
            let therapy_name = inputs
                .therapies
                .get(&session.therapy_id)
                .map_or_else(|| "Terapia desconhecida".to_string(), |t| t.name.clone());
            HistoryRow {
                date: session.session_date.strftime("%d/%m/%Y").to_string(),
                therapy_name,
                mean,
                mean_label: mean.map_or_else(|| "—".to_string(), |m| format!("{m:.1}")),
                status_label: mean.map_or_else(
                    || "Sem escala".to_string(),
                    |m| Level::from_average(m).label().to_string(),
                ),
                tier: mean.map(ValueTier::from_value),
            }
        })
        .collect();

    let critical = analysis
        .critical_fields
        .iter()
        .map(|cf| {
            // The numeric average lives in the index; the critical entry
            // only carries its display form.
            let average = analysis
                .per_field_index
                .iter()
                .find(|d| d.dimension == cf.field)
                .map(|d| d.current_average)
                .or_else(|| cf.value.parse().ok())
                .unwrap_or(0.0);
            let gap = (TARGET_AVERAGE - average).max(0.0);
            CriticalCard {
                field: cf.field.clone(),
                value: cf.value.clone(),
                gap,
                gap_label: if gap > 0.0 {
                    format!("{gap:.1} pontos até a meta")
                } else {
                    "Meta atingida".to_string()
                },
                recommendation: cf.recommendation.clone(),
            }
        })
        .collect();

    let recommendations = RecommendationSection {
        items: recommendation_items(tier),
        next_steps: vec![
            format!(
                "Revisar o plano terapêutico com base nas {} sessões registradas.",
                analysis.total_sessions
            ),
            format!(
                "Acompanhar de perto os {} campos em nível crítico.",
                analysis.critical_fields.len()
            ),
            "Reavaliar a evolução após as próximas 3 sessões.".to_string(),
            "Compartilhar este relatório com o paciente na próxima consulta.".to_string(),
        ],
    };

    ReportModel {
        cover,
        body: Some(ReportBody {
            summary,
            insights,
            field_rows,
            history,
            critical,
            recommendations,
        }),
    }
}

fn interpretation(tier: ScoreTier) -> String {
    match tier {
        ScoreTier::Excellent => {
            "O paciente apresenta excelente progresso terapêutico, com a maioria \
             dos campos avaliados em níveis elevados."
        }
        ScoreTier::Good => {
            "O paciente apresenta evolução consistente, com espaço para \
             aprofundamento em campos específicos."
        }
        ScoreTier::Attention => {
            "O quadro geral requer atenção: priorize os campos críticos \
             detalhados neste relatório."
        }
    }
    .to_string()
}

/// Templated prose bullets derived purely from thresholds — no free-text
/// generation.
fn insights(analysis: &AnalysisResult, tier: ScoreTier) -> Vec<String> {
    let mut out = Vec::with_capacity(3);

    out.push(match tier {
        ScoreTier::Excellent => format!(
            "Pontuação geral de {} indica excelente resposta ao protocolo terapêutico.",
            analysis.overall_score
        ),
        ScoreTier::Good => format!(
            "Pontuação geral de {} indica boa resposta, com evolução em andamento.",
            analysis.overall_score
        ),
        ScoreTier::Attention => format!(
            "Pontuação geral de {} indica necessidade de ajuste no protocolo.",
            analysis.overall_score
        ),
    });

    out.push(format!(
        "Velocidade de evolução classificada como: {}.",
        analysis.improvement_velocity.label().to_lowercase()
    ));

    let critical_count = analysis.critical_fields.len();
    out.push(if critical_count == 0 {
        "Nenhum campo crítico identificado no período analisado.".to_string()
    } else {
        format!(
            "{critical_count} campo(s) em nível crítico demandam acompanhamento próximo."
        )
    });

    out
}

fn recommendation_items(tier: ScoreTier) -> Vec<String> {
    let items: &[&str] = match tier {
        ScoreTier::Excellent => &[
            "Manter a frequência atual de sessões para consolidar os ganhos.",
            "Introduzir práticas de manutenção entre as sessões.",
            "Considerar espaçamento gradual das sessões conforme a estabilidade.",
        ],
        ScoreTier::Good => &[
            "Manter o protocolo atual com reforço nos campos abaixo da meta.",
            "Orientar práticas complementares em casa entre as sessões.",
            "Reavaliar os campos de menor pontuação a cada sessão.",
        ],
        ScoreTier::Attention => &[
            "Aumentar temporariamente a frequência das sessões.",
            "Priorizar os campos críticos no planejamento de cada sessão.",
            "Considerar protocolos complementares para os campos em regressão.",
            "Reavaliar o plano terapêutico integral na próxima consulta.",
        ],
    };
    items.iter().map(|s| (*s).to_string()).collect()
}
