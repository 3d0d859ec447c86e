use qr_studio::Studio;
use qr_studio::batch;
use qr_studio::config::{BatchFile, Configuration};
use qr_studio::content::ContentKind;
use qr_studio::export::ExportFormat;
use tempfile::tempdir;

#[tokio::test]
async fn batch_shares_one_session_and_survives_failures() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("out");
    let jobs = tmp.path().join("jobs.yaml");
    let oversized = "x".repeat(4000);
    std::fs::write(
        &jobs,
        format!(
            r##"
jobs:
  - name: Site
    content: {{ type: url, value: example.com }}
  - name: too-big
    content: {{ type: url, value: "{oversized}" }}
  - content: {{ type: phone, value: "" }}
  - content:
      type: wifi
      ssid: Guest
      encryption: nopass
    style:
      border: gradient
  - name: card
    content: {{ type: contact, name: Tran Thi B }}
"##
        ),
    )
    .unwrap();

    let cfg = Configuration {
        output_dir: out.clone(),
        file_name: "batch".into(),
        formats: vec![ExportFormat::Png, ExportFormat::Svg],
        ..Configuration::default()
    };
    let batch_file = BatchFile::from_yaml_file(&jobs).unwrap();
    let mut studio = Studio::new(cfg.payload_context());
    let report = batch::run_jobs(&mut studio, &cfg, &batch_file.jobs).await;

    assert_eq!(report.failed, 1);
    assert_eq!(report.skipped, 1);
    let expected = [
        "site.png",
        "site.svg",
        "batch_4.png",
        "batch_4.svg",
        "card.png",
        "card.svg",
    ];
    let written: Vec<_> = report
        .written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written, expected);
    let mut on_disk: Vec<_> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    on_disk.sort();
    let mut sorted = expected.to_vec();
    sorted.sort();
    assert_eq!(on_disk, sorted);

    // The failed job sits between successes; later jobs still count.
    let stats = studio.stats();
    assert_eq!(stats.total(), 3);
    assert_eq!(stats.count(ContentKind::Url), 1);
    assert_eq!(stats.count(ContentKind::Wifi), 1);
    assert_eq!(stats.count(ContentKind::Contact), 1);
    assert_eq!(stats.count(ContentKind::Phone), 0);
    assert_eq!(studio.current().unwrap().kind(), ContentKind::Contact);
}

#[tokio::test]
async fn missing_logo_still_exports() {
    let tmp = tempdir().unwrap();
    let cfg = Configuration {
        output_dir: tmp.path().to_path_buf(),
        logo: Some(tmp.path().join("absent.png")),
        ..Configuration::default()
    };
    let mut studio = Studio::new(cfg.payload_context());
    let paths = batch::render_job(
        &mut studio,
        &cfg,
        "menu",
        &qr_studio::ContentDescriptor::url("example.com/menu"),
        &cfg.style,
        cfg.logo.as_deref(),
    )
    .await
    .unwrap();
    assert_eq!(paths, vec![tmp.path().join("menu.png")]);
    assert!(!studio.current().unwrap().logo_applied());
}
