use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use intake_core::{CaseGateway, CaseRepository, Clock, CoreError, SubmissionError};
use intake_domain::{CasePayload, CaseReceipt, CaseRecord, FieldKey};
use uuid::Uuid;

const CASE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Filesystem-backed case service: one pretty-printed JSON file per case.
#[derive(Clone)]
pub struct JsonCaseStore {
    cases_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JsonCaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonCaseStore")
            .field("cases_dir", &self.cases_dir)
            .finish()
    }
}

impl JsonCaseStore {
    pub fn new(cases_dir: PathBuf, clock: Arc<dyn Clock>) -> Result<Self, CoreError> {
        fs::create_dir_all(&cases_dir)?;
        Ok(Self { cases_dir, clock })
    }

    pub fn cases_dir(&self) -> &Path {
        &self.cases_dir
    }

    pub fn case_path(&self, id: Uuid) -> PathBuf {
        self.cases_dir.join(format!("{}.{}", id, CASE_EXTENSION))
    }

    fn write_record(&self, record: &CaseRecord) -> Result<(), SubmissionError> {
        let json = serde_json::to_string_pretty(record)
            .map_err(|err| SubmissionError::Unexpected(err.to_string()))?;
        let path = self.case_path(record.id);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|err| SubmissionError::Network(err.to_string()))
    }
}

impl CaseGateway for JsonCaseStore {
    fn create_case(&self, payload: &CasePayload) -> Result<CaseReceipt, SubmissionError> {
        let problems = server_validation(payload);
        if !problems.is_empty() {
            tracing::warn!(fields = problems.len(), "case payload rejected");
            return Err(SubmissionError::Rejected(problems));
        }
        let record = CaseRecord::new(Uuid::new_v4(), payload.clone(), self.clock.now());
        self.write_record(&record)?;
        tracing::info!(case_id = %record.id, category = record.payload.category().id(), "case stored");
        Ok(record.receipt())
    }
}

impl CaseRepository for JsonCaseStore {
    fn list_cases(&self) -> Result<Vec<CaseRecord>, CoreError> {
        if !self.cases_dir.exists() {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.cases_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(CASE_EXTENSION) {
                continue;
            }
            match load_record_from_path(&path) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable case file")
                }
            }
        }
        records.sort_by_key(|record| (Reverse(record.created_at), record.id));
        Ok(records)
    }

    fn load_case(&self, id: Uuid) -> Result<CaseRecord, CoreError> {
        let path = self.case_path(id);
        if !path.exists() {
            return Err(CoreError::CaseNotFound(id.to_string()));
        }
        load_record_from_path(&path)
    }
}

/// Field problems the case service reports back to the wizard.
pub fn server_validation(payload: &CasePayload) -> Vec<(FieldKey, String)> {
    let mut problems = Vec::new();
    let description = payload.brief_description.trim();
    if description.is_empty() {
        problems.push((
            FieldKey::BriefDescription,
            "A brief description is required.".to_string(),
        ));
    } else if description.chars().count() > MAX_DESCRIPTION_CHARS {
        problems.push((
            FieldKey::BriefDescription,
            format!(
                "Please keep the description under {} characters.",
                MAX_DESCRIPTION_CHARS
            ),
        ));
    }
    if payload.communication.contact_method.is_empty() {
        problems.push((
            FieldKey::ContactMethod,
            "At least one contact method is required.".to_string(),
        ));
    }
    problems
}

/// Loads a case record from the provided filesystem path.
pub fn load_record_from_path(path: &Path) -> Result<CaseRecord, CoreError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| {
        CoreError::Serde(format!("{}: {}", path.display(), err))
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
