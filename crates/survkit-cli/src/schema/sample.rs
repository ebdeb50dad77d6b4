use serde::{Deserialize, Serialize};
use survkit_stats::SurvivalData;

/// One observed subject as stored in a samples JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SurvivalRecord {
    /// Whether the event was observed (`false` means censored)
    pub event: bool,
    /// Time of event or censoring
    pub time: f64,
    /// Time the subject entered the study, for left-truncated data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<f64>,
    /// Predicted risk score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
}

/// Survival records split into parallel columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleColumns {
    pub event: Vec<bool>,
    pub time: Vec<f64>,
    pub entry: Option<Vec<f64>>,
    pub estimate: Option<Vec<f64>>,
}

/// Collects an optional per-record field, requiring it on all records or none.
fn optional_column<F>(
    records: &[SurvivalRecord],
    field: &str,
    get: F,
) -> anyhow::Result<Option<Vec<f64>>>
where
    F: Fn(&SurvivalRecord) -> Option<f64>,
{
    let values = records.iter().map(&get).collect::<Option<Vec<_>>>();
    if values.is_none() && records.iter().any(|r| get(r).is_some()) {
        anyhow::bail!("'{field}' must be given for all samples or for none");
    }
    Ok(values)
}

impl SampleColumns {
    pub fn from_records(records: &[SurvivalRecord]) -> anyhow::Result<Self> {
        if records.is_empty() {
            anyhow::bail!("no samples found");
        }
        Ok(Self {
            event: records.iter().map(|r| r.event).collect(),
            time: records.iter().map(|r| r.time).collect(),
            entry: optional_column(records, "entry", |r| r.entry)?,
            estimate: optional_column(records, "estimate", |r| r.estimate)?,
        })
    }

    pub fn survival_data(&self) -> anyhow::Result<SurvivalData> {
        let records = self.event.iter().copied().zip(self.time.iter().copied());
        Ok(SurvivalData::from_records(records)?)
    }

    pub fn require_estimate(&self) -> anyhow::Result<&[f64]> {
        self.estimate
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("samples have no 'estimate' field"))
    }
}
