//! Seed data for the in-memory store.
//!
//! A seed file is a JSON document with `employees` and `novelties` arrays,
//! using the same record shapes the HTTP API accepts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PayrollNovelty};

use super::MemoryStore;

/// Employees and novelties to load into a fresh store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    /// Employee records.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Novelty records.
    #[serde(default)]
    pub novelties: Vec<PayrollNovelty>,
}

impl SeedData {
    /// Reads seed data from a JSON file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        if !path.exists() {
            return Err(EngineError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let seed: SeedData =
            serde_json::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        info!(
            path = %path.display(),
            employees = seed.employees.len(),
            novelties = seed.novelties.len(),
            "Loaded seed data"
        );
        Ok(seed)
    }

    /// Builds a [`MemoryStore`] holding this data.
    pub fn into_store(self) -> EngineResult<MemoryStore> {
        MemoryStore::from_seed(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Compensation, NoveltyType};
    use crate::store::EmployeeStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SEED: &str = r#"{
        "employees": [
            {
                "id": "emp_001",
                "identification": "1020304050",
                "first_name": "Laura",
                "last_name": "Gomez",
                "contract_type": "monthly",
                "base_salary": "2000000",
                "department": "Finance"
            },
            {
                "id": "emp_002",
                "identification": "5040302010",
                "first_name": "Pedro",
                "last_name": "Diaz",
                "contract_type": "daily",
                "daily_rate": "50000",
                "working_days": 20
            }
        ],
        "novelties": [
            {
                "id": "nov_001",
                "employee_id": "emp_001",
                "novelty_type": "bonus",
                "amount": "100000",
                "date": "2025-03-05"
            }
        ]
    }"#;

    fn write_seed(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_seed_file() {
        let file = write_seed(SEED);

        let seed = SeedData::load(file.path()).unwrap();

        assert_eq!(seed.employees.len(), 2);
        assert_eq!(
            seed.employees[1].compensation,
            Compensation::Daily {
                daily_rate: rust_decimal::Decimal::from(50_000),
                working_days: 20
            }
        );
        assert_eq!(seed.novelties[0].novelty_type, NoveltyType::Bonus);
    }

    #[test]
    fn test_load_missing_file() {
        let result = SeedData::load(Path::new("/nonexistent/seed.json"));
        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let file = write_seed("{ not json");
        let result = SeedData::load(file.path());
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[tokio::test]
    async fn test_into_store() {
        let file = write_seed(SEED);
        let store = SeedData::load(file.path()).unwrap().into_store().unwrap();

        let employee = store.get_employee("emp_001").await.unwrap();
        assert_eq!(employee.department, "Finance");
    }
}
