use qr_studio::config::{BatchFile, Configuration};
use qr_studio::content::{ContentDescriptor, ContentKind, WifiEncryption};
use qr_studio::export::ExportFormat;
use qr_studio::language::Language;
use qr_studio::style::{BorderKind, Color};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn parse_kebab_case_config() {
    let yaml = r##"
language: en
origin: "https://qr.example.com"
output-dir: "/tmp/qr"
file-name: "Menu QR"
formats: [png, svg]
logo: "/srv/logo.png"
style:
  foreground: "#1E3A8A"
  background: "#FFFFFF"
  logo-size: 25
  border: dashed
  border-color: "#EC4899"
"##;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    let cfg = cfg.validated().unwrap();
    assert_eq!(cfg.language, Language::En);
    assert_eq!(cfg.output_dir, PathBuf::from("/tmp/qr"));
    assert_eq!(cfg.file_name, "Menu QR");
    assert_eq!(cfg.formats, vec![ExportFormat::Png, ExportFormat::Svg]);
    assert_eq!(cfg.logo, Some(PathBuf::from("/srv/logo.png")));
    assert_eq!(cfg.style.foreground, Color::rgb(0x1E, 0x3A, 0x8A));
    assert_eq!(cfg.style.logo_size, 25);
    assert_eq!(cfg.style.border, BorderKind::Dashed);

    let ctx = cfg.payload_context();
    assert_eq!(ctx.language, Language::En);
    assert_eq!(ctx.origin, "https://qr.example.com");
}

#[test]
fn rejects_unknown_border_and_bad_color() {
    assert!(serde_yaml::from_str::<Configuration>("style:\n  border: wavy\n").is_err());
    assert!(serde_yaml::from_str::<Configuration>("style:\n  foreground: blue\n").is_err());
}

#[test]
fn rejects_empty_formats() {
    let cfg: Configuration = serde_yaml::from_str("formats: []").unwrap();
    assert!(cfg.validated().is_err());
}

#[test]
fn loads_batch_jobs() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("jobs.yaml");
    std::fs::write(
        &path,
        r##"
jobs:
  - name: site
    content: { type: url, value: example.com }
  - content:
      type: wifi
      ssid: Guest
      encryption: nopass
    style:
      border: gradient
  - content:
      type: vcard
      name: Tran Thi B
      email: b@example.com
"##,
    )
    .unwrap();

    let batch = BatchFile::from_yaml_file(&path).unwrap();
    assert_eq!(batch.jobs.len(), 3);
    assert_eq!(batch.jobs[0].name.as_deref(), Some("site"));
    assert_eq!(batch.jobs[0].content, ContentDescriptor::url("example.com"));
    match &batch.jobs[1].content {
        ContentDescriptor::Wifi(wifi) => {
            assert_eq!(wifi.encryption, WifiEncryption::NoPass);
            assert_eq!(wifi.password, "");
        }
        other => panic!("expected wifi, got {other:?}"),
    }
    assert_eq!(
        batch.jobs[1].style.as_ref().map(|s| s.border),
        Some(BorderKind::Gradient)
    );
    assert_eq!(batch.jobs[2].content.kind(), ContentKind::Contact);
}

#[test]
fn batch_with_invalid_style_is_rejected() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("jobs.yaml");
    std::fs::write(
        &path,
        "jobs:\n  - content: { type: phone, value: '1' }\n    style: { logo-size: 5 }\n",
    )
    .unwrap();
    assert!(BatchFile::from_yaml_file(&path).is_err());
}
