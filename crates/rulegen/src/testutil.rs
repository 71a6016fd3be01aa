use deploy_config::{loader::load_config_from_str, Config};

const CONFIG_YAML: &str = r#"
overall:
  organization_id: '12345678'
  folder_id: '98765321'
  billing_account: 000000-000000-000000
  domain: 'domain.com'
  allowed_apis:
  - foo-api.googleapis.com
  - bar-api.googleapis.com

forseti:
  project:
    project_id: my-forseti-project
    owners_group: my-forseti-project-owners@my-domain.com
    auditors_group: my-forseti-project-auditors@my-domain.com
    audit_logs:
      logs_gcs_bucket:
        location: US
        storage_class: MULTI_REGIONAL
        ttl_days: 365
      logs_bigquery_dataset:
        location: US
    generated_fields:
      project_number: '2222'
      log_sink_service_account: audit-logs-bq@logging-2222.iam.gserviceaccount.com
  generated_fields:
    service_account: forseti@my-forseti-project.iam.gserviceaccount.com
    server_bucket: gs://my-forseti-project-server/

projects:
- project_id: my-project
  owners_group: my-project-owners@my-domain.com
  editors_group: my-project-editors@mydomain.com
  auditors_group: my-project-auditors@my-domain.com
  data_readwrite_groups:
  - my-project-readwrite@my-domain.com
  data_readonly_groups:
  - my-project-readonly@my-domain.com
  - another-readonly-group@googlegroups.com
  enabled_apis:
  - foo-api.googleapis.com
  audit_logs:
    logs_gcs_bucket:
      location: US
      storage_class: MULTI_REGIONAL
      ttl_days: 365
    logs_bigquery_dataset:
      location: US
  generated_fields:
    project_number: '1111'
    log_sink_service_account: audit-logs-bq@logging-1111.iam.gserviceaccount.com
    gce_instance_info:
    - name: foo-instance
      id: '123'
"#;

/// Loaded test config whose single project also carries `extra_project_yaml`
/// (written at project-key indentation, i.e. starting in column 0).
pub(crate) fn config_with(extra_project_yaml: &str) -> Config {
    let mut yaml = CONFIG_YAML.to_string();
    for line in extra_project_yaml.lines() {
        yaml.push_str("  ");
        yaml.push_str(line);
        yaml.push('\n');
    }
    load_config_from_str(&yaml).expect("test config should load")
}

pub(crate) fn config() -> Config {
    config_with("")
}

/// Parse expected rules written as YAML.
pub(crate) fn rules_from_yaml<T: serde::de::DeserializeOwned>(yaml: &str) -> Vec<T> {
    serde_yml::from_str(yaml).expect("expected rules YAML should parse")
}
