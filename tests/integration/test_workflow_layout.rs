use omictl::core::bundle::bundle_workflow;
use omictl::core::types::WorkflowLayout;
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

/// A realistic workflow directory bundles cleanly and the bundle contains
/// the definition sources alongside the registration metadata files.
#[test]
fn test_full_workflow_directory_bundles() {
    let temp = TempDir::new().unwrap();
    let workflows_dir = temp.path().join("workflows");
    let layout = WorkflowLayout::new(&workflows_dir, "to_bam");

    fs::create_dir_all(layout.root.join("modules")).unwrap();
    fs::write(layout.root.join("main.nf"), "workflow { TO_BAM() }").unwrap();
    fs::write(layout.root.join("modules/to_bam.nf"), "process TO_BAM {}").unwrap();
    fs::write(
        layout.parameter_template_path(),
        r#"{"fastq_one": {"description": "forward reads"}}"#,
    )
    .unwrap();
    fs::write(
        layout.registration_input_path(),
        "description: demo\nengine: NEXTFLOW\nmain: main.nf\n",
    )
    .unwrap();
    fs::write(layout.run_parameters_path(), r#"{"region": "{{region}}"}"#).unwrap();

    let bytes = bundle_workflow(&layout.root).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(names.contains(&"main.nf".to_string()));
    assert!(names.contains(&"modules/to_bam.nf".to_string()));
    assert!(names.contains(&"parameter-template.json".to_string()));
    assert!(names.contains(&"cli-input.yaml".to_string()));
    // No absolute paths, no directory entries.
    assert!(names.iter().all(|n| !n.starts_with('/') && !n.ends_with('/')));
}
