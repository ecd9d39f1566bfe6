use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ScreenError;

/// Locked hiring criteria for one scoring batch. Read-only once handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawJobCriteria")]
pub struct JobCriteria {
    pub min_experience_years: f64,
    /// Case-insensitive; duplicates are collapsed when skills are looked up.
    pub required_skills: Vec<String>,
    /// 0 – 100
    pub min_final_score: u8,
    /// Job description the resume text is compared against.
    pub job_description: String,
}

impl JobCriteria {
    pub fn new(
        min_experience_years: f64,
        required_skills: Vec<String>,
        min_final_score: u8,
        job_description: impl Into<String>,
    ) -> Result<Self, ScreenError> {
        if !min_experience_years.is_finite() || min_experience_years < 0.0 {
            return Err(ScreenError::Validation(format!(
                "min_experience_years must be a non-negative number, got {min_experience_years}"
            )));
        }
        if min_final_score > 100 {
            return Err(ScreenError::Validation(format!(
                "min_final_score must be between 0 and 100, got {min_final_score}"
            )));
        }

        Ok(Self {
            min_experience_years,
            required_skills: required_skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            min_final_score,
            job_description: job_description.into(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ScreenError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Splits a comma-separated skill list ("Python, SQL, , Excel") into trimmed, non-empty items.
pub fn parse_skill_list(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Deserialize)]
struct RawJobCriteria {
    #[serde(default)]
    min_experience_years: f64,
    #[serde(default, deserialize_with = "skills_from_list_or_csv")]
    required_skills: Vec<String>,
    #[serde(default)]
    min_final_score: u8,
    #[serde(default)]
    job_description: String,
}

impl TryFrom<RawJobCriteria> for JobCriteria {
    type Error = ScreenError;

    fn try_from(raw: RawJobCriteria) -> Result<Self, Self::Error> {
        JobCriteria::new(
            raw.min_experience_years,
            raw.required_skills,
            raw.min_final_score,
            raw.job_description,
        )
    }
}

fn skills_from_list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SkillsField {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match SkillsField::deserialize(deserializer)? {
        SkillsField::List(items) => items,
        SkillsField::Csv(csv) => parse_skill_list(&csv),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skill_list_trims_and_drops_empty() {
        assert_eq!(
            parse_skill_list(" Python, SQL , ,Power BI,"),
            vec!["Python", "SQL", "Power BI"]
        );
        assert!(parse_skill_list("").is_empty());
    }

    #[test]
    fn test_new_rejects_negative_experience() {
        let err = JobCriteria::new(-1.0, vec![], 50, "").unwrap_err();
        assert!(matches!(err, ScreenError::Validation(_)));
    }

    #[test]
    fn test_new_rejects_nan_experience() {
        assert!(JobCriteria::new(f64::NAN, vec![], 50, "").is_err());
    }

    #[test]
    fn test_new_rejects_score_above_100() {
        assert!(JobCriteria::new(2.0, vec![], 101, "").is_err());
    }

    #[test]
    fn test_from_json_accepts_list_of_skills() {
        let criteria = JobCriteria::from_json(
            r#"{
                "min_experience_years": 2,
                "required_skills": ["python", " sql "],
                "min_final_score": 50,
                "job_description": "Data analyst with Python and SQL"
            }"#,
        )
        .unwrap();
        assert_eq!(criteria.min_experience_years, 2.0);
        assert_eq!(criteria.required_skills, vec!["python", "sql"]);
        assert_eq!(criteria.min_final_score, 50);
    }

    #[test]
    fn test_from_json_accepts_csv_skills() {
        let criteria = JobCriteria::from_json(
            r#"{"min_experience_years": 1.5, "required_skills": "Python, SQL, Excel", "min_final_score": 40}"#,
        )
        .unwrap();
        assert_eq!(criteria.required_skills, vec!["Python", "SQL", "Excel"]);
        assert!(criteria.job_description.is_empty());
    }

    #[test]
    fn test_from_json_runs_validation() {
        let result = JobCriteria::from_json(r#"{"min_experience_years": -3, "min_final_score": 10}"#);
        assert!(result.is_err());
    }
}
