use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use screener::{
    collect_inputs, screen_batch, DocumentFormat, IntakeLimits, JobCriteria, OcrConfig,
    ScreeningEngine, ScreeningStatus,
};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CRITERIA: &str = r#"{
    "min_experience_years": 2,
    "required_skills": "Python, SQL, Power BI",
    "min_final_score": 40,
    "job_description": "Data analyst with Python, SQL and Power BI building reporting dashboards."
}"#;

const STRONG: &str = "Jane Doe. Data analyst with 3 years 6 months of experience. \
                      Python and SQL every day; built Power BI reporting dashboards.";
const WEAK: &str = "Pastry chef, 12 years in laminated doughs. No experience in python.";

fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut buf = std::io::Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buf);
        zip.start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    buf.into_inner()
}

fn write_bundle(dir: &Path, entries: &[(&str, Vec<u8>)]) -> PathBuf {
    let path = dir.join("applicants.zip");
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    for (name, body) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(body).unwrap();
    }
    zip.finish().unwrap();
    path
}

fn engine() -> ScreeningEngine {
    let criteria = JobCriteria::from_json(CRITERIA).unwrap();
    ScreeningEngine::new(
        criteria,
        OcrConfig {
            enabled: false,
            ..OcrConfig::default()
        },
    )
}

#[tokio::test]
async fn test_bundle_and_loose_files_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    let loose = dir.path().join("walk_in.txt");
    fs::write(&loose, WEAK).unwrap();

    let bundle = write_bundle(
        dir.path(),
        &[
            ("jane.docx", docx_bytes(&["Jane Doe", STRONG])),
            ("blank.txt", b"   ".to_vec()),
            ("cover_letter.md", b"ignored".to_vec()),
        ],
    );

    let intake = collect_inputs(&[loose.clone(), bundle], &IntakeLimits::default());
    let files = intake.files().to_vec();
    assert_eq!(files.len(), 3);
    assert_eq!(files[1].format, DocumentFormat::Docx);

    let report = screen_batch(engine(), files, 2).await;
    let outcomes = &report.outcomes;

    assert_eq!(outcomes[0].source_path, loose);
    assert_eq!(outcomes[0].status, ScreeningStatus::Rejected);
    assert!(outcomes[0].record.missing_skills.contains("python"));
    assert_eq!(outcomes[0].extracted_text, WEAK);
    assert_eq!(
        serde_json::to_value(outcomes[0].skill_details["python"].reason).unwrap(),
        "negative_context"
    );

    let jane = &outcomes[1];
    assert_eq!(jane.status, ScreeningStatus::Selected, "record: {:?}", jane.record);
    assert_eq!(jane.record.experience, 3.5);
    assert_eq!(jane.record.experience_component, 100.0);
    assert!(jane.record.missing_skills.is_empty());
    assert!((0.0..=100.0).contains(&jane.record.final_score));

    assert_eq!(outcomes[2].status, ScreeningStatus::Pending);
    assert_eq!(outcomes[2].record.final_score, 0.0);
    assert!(outcomes[2].skill_details.is_empty());

    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.selected, 1);
    assert_eq!(report.summary.rejected, 1);
    assert_eq!(report.summary.pending, 1);
}

#[tokio::test]
async fn test_rescreening_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let cv = dir.path().join("cv.txt");
    fs::write(&cv, STRONG).unwrap();

    let intake = collect_inputs(&[cv], &IntakeLimits::default());
    let first = screen_batch(engine(), intake.files().to_vec(), 1).await;
    let second = screen_batch(engine(), intake.files().to_vec(), 4).await;

    assert_eq!(first.outcomes[0].record, second.outcomes[0].record);
    assert_ne!(first.summary.batch_id, second.summary.batch_id);
}

#[tokio::test]
async fn test_outcome_serializes_for_persistence() {
    let dir = tempfile::tempdir().unwrap();
    let cv = dir.path().join("cv.txt");
    fs::write(&cv, STRONG).unwrap();

    let intake = collect_inputs(&[cv], &IntakeLimits::default());
    let report = screen_batch(engine(), intake.files().to_vec(), 1).await;
    let json = serde_json::to_value(&report.outcomes[0]).unwrap();

    assert_eq!(json["status"], "Selected");
    assert_eq!(json["format"], "txt");
    assert_eq!(json["record"]["decision"], "Selected");
    assert_eq!(json["record"]["matched_skills"].as_array().unwrap().len(), 3);
    assert_eq!(json["extracted_text"], STRONG);
    assert_eq!(json["skill_details"]["python"]["reason"], "exact_match");
    assert_eq!(json["skill_details"]["power bi"]["matched_variant"], "power bi");
    assert_eq!(json["skill_details"]["sql"]["matched"], true);
}
