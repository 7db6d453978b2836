use folio_config::{FolioConfigLoader, SourceConfig};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "1"
logging:
  level: debug
images:
  max_dimension: 120
source:
  kind: linkedin
  profile_url: "https://www.linkedin.com/in/someone/"
  email: "${FOLIO_TEST_EMAIL}"
  password: "${FOLIO_TEST_PASSWORD}"
  wait_secs: 4
  "#;
    let p = write_yaml(&tmp, "folio.yaml", file_yaml);

    temp_env::with_vars(
        [
            ("FOLIO_TEST_EMAIL", Some("someone@example.com")),
            ("FOLIO_TEST_PASSWORD", Some("hunter2")),
        ],
        || {
            let config = FolioConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load folio config");

            assert_eq!(config.images.max_dimension, 120);
            assert_eq!(config.images.jpeg_quality, 85);
            match config.source {
                Some(SourceConfig::Linkedin {
                    email,
                    password,
                    wait_secs,
                    ..
                }) => {
                    assert_eq!(email, "someone@example.com");
                    assert_eq!(password, "hunter2");
                    assert_eq!(wait_secs, 4);
                }
                other => panic!("unexpected source: {other:?}"),
            }
        },
    );
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "folio.yaml", "images:\n  jpeg_quality: 85\n");

    temp_env::with_var("FOLIO__IMAGES__JPEG_QUALITY", Some("60"), || {
        let config = FolioConfigLoader::new().with_file(&p).load().unwrap();
        assert_eq!(config.images.jpeg_quality, 60);
    });
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = FolioConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults only");
    assert!(config.source.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = FolioConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(result.is_err());
}

#[test]
#[serial]
fn sample_config_loads_and_points_at_the_bare_profile() {
    let sample = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../folio.example.yaml");
    let config = FolioConfigLoader::new().with_file(&sample).load().unwrap();
    assert!(matches!(config.source, Some(SourceConfig::File { .. })));
    assert_eq!(config.images.max_image_bytes, 5 * 1024 * 1024);

    // The capturer clicks through to the experience list itself.
    let text = fs::read_to_string(&sample).unwrap();
    let profile_line = text
        .lines()
        .find(|l| l.contains("profile_url:"))
        .expect("sample documents the linkedin source");
    assert!(!profile_line.contains("/details/"));
}
