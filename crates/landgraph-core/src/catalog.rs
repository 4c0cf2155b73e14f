//! The external service catalog model.
//!
//! Catalog documents come from proto-descriptor JSON exports with the shape
//! `{ "files": [ { "services": [ { "name", "fullName", "description" } ] } ] }`.
//! A service's domain is the first two dot-separated segments of its fully
//! qualified name. Malformed entries are skipped, never fatal.

use crate::{Error, Result};
use indexmap::IndexSet;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogService {
    pub name: String,
    pub full_name: String,
    pub domain: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub services: Vec<CatalogService>,
    pub domains: IndexSet<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingests one proto-descriptor document. Entries missing a name or a
    /// two-segment fully qualified name are dropped with a warning; a
    /// document without a `files` array is rejected outright.
    pub fn push_proto_document(&mut self, document: &Value) -> Result<()> {
        let files = document
            .get("files")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::CatalogDocument {
                message: "missing `files` array".to_string(),
            })?;

        for file in files {
            let Some(services) = file.get("services").and_then(Value::as_array) else {
                continue;
            };
            for service in services {
                match parse_service(service) {
                    Some(entry) => {
                        self.domains.insert(entry.domain.clone());
                        self.services.push(entry);
                    }
                    None => {
                        tracing::warn!(entry = %service, "skipping malformed catalog entry");
                    }
                }
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.domains.is_empty()
    }
}

/// `domain` = first two dot-segments of the fully qualified name.
pub fn domain_of(full_name: &str) -> Option<String> {
    let mut segments = full_name.split('.');
    let first = segments.next().filter(|s| !s.is_empty())?;
    let second = segments.next().filter(|s| !s.is_empty())?;
    Some(format!("{first}.{second}"))
}

fn parse_service(value: &Value) -> Option<CatalogService> {
    let name = value.get("name")?.as_str().filter(|s| !s.is_empty())?;
    let full_name = value.get("fullName")?.as_str()?;
    let domain = domain_of(full_name)?;
    Some(CatalogService {
        name: name.to_string(),
        full_name: full_name.to_string(),
        domain,
        description: value
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_collects_services_and_derived_domains() {
        let mut catalog = Catalog::new();
        catalog
            .push_proto_document(&json!({
                "files": [
                    {
                        "services": [
                            { "name": "InvoiceService", "fullName": "billing.invoices.InvoiceService", "description": "invoices" },
                            { "name": "LedgerService", "fullName": "billing.ledger.LedgerService" }
                        ]
                    }
                ]
            }))
            .unwrap();

        assert_eq!(catalog.services.len(), 2);
        assert_eq!(catalog.services[0].domain, "billing.invoices");
        assert!(catalog.domains.contains("billing.ledger"));
        assert_eq!(catalog.services[1].description, None);
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let mut catalog = Catalog::new();
        catalog
            .push_proto_document(&json!({
                "files": [
                    {
                        "services": [
                            { "name": "NoDomain", "fullName": "single" },
                            { "fullName": "a.b.Nameless" },
                            { "name": "Good", "fullName": "a.b.Good" }
                        ]
                    }
                ]
            }))
            .unwrap();

        assert_eq!(catalog.services.len(), 1);
        assert_eq!(catalog.services[0].name, "Good");
    }

    #[test]
    fn document_without_files_is_rejected() {
        let mut catalog = Catalog::new();
        let err = catalog.push_proto_document(&json!({ "nope": [] })).unwrap_err();
        assert!(err.to_string().contains("files"));
    }

    #[test]
    fn domain_is_first_two_segments() {
        assert_eq!(domain_of("a.b.C"), Some("a.b".to_string()));
        assert_eq!(domain_of("a.b"), Some("a.b".to_string()));
        assert_eq!(domain_of("a"), None);
        assert_eq!(domain_of(""), None);
    }
}
