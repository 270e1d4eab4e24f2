//! CycloneDX SBOM parser.
//!
//! Supports CycloneDX JSON versions 1.4, 1.5 and 1.6.

use crate::model::{
    Analysis, Annotation, ComponentType, Composition, Contact, DependencyPair, DocComponent,
    DocumentMetadata, Hash, Organization, Property, Rating, SbomDocument, SbomFormat, Tool,
    Vulnerability,
};
use crate::parsers::traits::{ParseError, SbomParser};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Parser for CycloneDX JSON documents
#[derive(Debug, Default, Clone, Copy)]
pub struct CycloneDxParser;

impl CycloneDxParser {
    /// Create a new CycloneDX parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse a CycloneDX BOM from a JSON reader without buffering the whole input
    pub fn parse_json_reader<R: std::io::Read>(
        &self,
        reader: R,
    ) -> Result<SbomDocument, ParseError> {
        let cdx: CycloneDxBom = serde_json::from_reader(reader)?;
        convert_document(cdx)
    }
}

impl SbomParser for CycloneDxParser {
    fn parse_str(&self, content: &str) -> Result<SbomDocument, ParseError> {
        if !content.trim_start().starts_with('{') {
            return Err(ParseError::UnknownFormat(
                "Expected JSON CycloneDX format".to_string(),
            ));
        }
        let cdx: CycloneDxBom = serde_json::from_str(content)?;
        convert_document(cdx)
    }

    fn supported_versions(&self) -> Vec<&str> {
        vec!["1.4", "1.5", "1.6"]
    }

    fn format_name(&self) -> &str {
        "CycloneDX"
    }

    fn can_parse(&self, content: &str) -> bool {
        if !content.trim_start().starts_with('{') {
            return false;
        }
        let has_bom_format = content.contains("\"bomFormat\"");
        let has_schema = content.contains("\"$schema\"") && content.contains("cyclonedx");
        has_bom_format || has_schema
    }
}

// ============================================================================
// Conversion into the document model
// ============================================================================

fn convert_document(cdx: CycloneDxBom) -> Result<SbomDocument, ParseError> {
    let spec_version = cdx
        .spec_version
        .ok_or_else(|| ParseError::MissingField("specVersion".to_string()))?;

    let mut metadata = DocumentMetadata {
        format: SbomFormat::CycloneDx,
        spec_version,
        serial_number: cdx.serial_number,
        version: cdx.version,
        ..Default::default()
    };

    let mut primary = None;
    if let Some(meta) = cdx.metadata {
        metadata.timestamp = meta.timestamp.as_deref().and_then(parse_timestamp);
        metadata.tools = meta
            .tools
            .unwrap_or_default()
            .into_iter()
            .map(|t| Tool {
                vendor: t.vendor,
                name: t.name.unwrap_or_else(|| "unknown".to_string()),
                version: t.version,
            })
            .collect();
        metadata.authors = meta
            .authors
            .unwrap_or_default()
            .into_iter()
            .map(CdxContact::into_contact)
            .collect();
        metadata.supplier = meta.supplier.and_then(CdxOrganization::into_organization);
        metadata.manufacturer = meta
            .manufacturer
            .and_then(CdxOrganization::into_organization);
        metadata.licenses = convert_licenses(meta.licenses.as_deref());
        primary = meta.component.map(convert_component);
    }

    let components = cdx
        .components
        .unwrap_or_default()
        .into_iter()
        .map(convert_component)
        .collect();

    let dependencies = cdx
        .dependencies
        .unwrap_or_default()
        .into_iter()
        .map(|d| DependencyPair::new(d.ref_field, d.depends_on.unwrap_or_default()))
        .collect();

    let vulnerabilities = cdx
        .vulnerabilities
        .unwrap_or_default()
        .into_iter()
        .map(convert_vulnerability)
        .collect();

    let annotations = cdx
        .annotations
        .unwrap_or_default()
        .into_iter()
        .map(|a| Annotation {
            bom_ref: a.bom_ref,
            subjects: a.subjects.unwrap_or_default(),
            annotator: a
                .annotator
                .and_then(CdxAnnotator::display_name)
                .unwrap_or_else(|| "unknown".to_string()),
            timestamp: a.timestamp,
            text: a.text.unwrap_or_default(),
        })
        .collect();

    let compositions = cdx
        .compositions
        .unwrap_or_default()
        .into_iter()
        .map(|c| Composition {
            aggregate: c.aggregate.unwrap_or_else(|| "unknown".to_string()),
            assemblies: c.assemblies.unwrap_or_default(),
            dependencies: c.dependencies.unwrap_or_default(),
        })
        .collect();

    let doc = SbomDocument {
        metadata,
        primary,
        components,
        dependencies,
        vulnerabilities,
        annotations,
        compositions,
    };
    tracing::debug!(
        components = doc.component_count(),
        dependencies = doc.dependencies.len(),
        vulnerabilities = doc.vulnerabilities.len(),
        "parsed CycloneDX document"
    );
    Ok(doc)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!("ignoring unparseable timestamp {value:?}: {e}");
            None
        }
    }
}

/// Convert a component and its nested components.
///
/// Nesting is bounded by the JSON deserializer's recursion limit.
fn convert_component(cdx: CdxComponent) -> DocComponent {
    let component_type = cdx
        .component_type
        .as_deref()
        .map_or(ComponentType::Library, ComponentType::parse);

    DocComponent {
        bom_ref: cdx.bom_ref,
        component_type,
        name: cdx.name.unwrap_or_default(),
        version: cdx.version,
        purl: cdx.purl,
        cpe: cdx.cpe,
        description: cdx.description,
        group: cdx.group,
        scope: cdx.scope,
        supplier: cdx.supplier.and_then(|s| s.name),
        licenses: convert_licenses(cdx.licenses.as_deref()),
        hashes: cdx
            .hashes
            .unwrap_or_default()
            .into_iter()
            .map(|h| Hash::new(h.alg, h.content))
            .collect(),
        properties: cdx
            .properties
            .unwrap_or_default()
            .into_iter()
            .map(|p| Property {
                name: p.name,
                value: p.value.unwrap_or_default(),
            })
            .collect(),
        components: cdx
            .components
            .unwrap_or_default()
            .into_iter()
            .map(convert_component)
            .collect(),
    }
}

fn convert_licenses(choices: Option<&[CdxLicenseChoice]>) -> Vec<String> {
    let mut licenses = Vec::new();
    for choice in choices.unwrap_or_default() {
        if let Some(license) = &choice.license {
            let expr = license
                .id
                .clone()
                .or_else(|| license.name.clone())
                .unwrap_or_else(|| "NOASSERTION".to_string());
            licenses.push(expr);
        }
        if let Some(expr) = &choice.expression {
            licenses.push(expr.clone());
        }
    }
    licenses
}

fn convert_vulnerability(cdx: CdxVulnerability) -> Vulnerability {
    Vulnerability {
        id: cdx.id.unwrap_or_else(|| "unknown".to_string()),
        source: cdx.source.and_then(|s| s.name),
        ratings: cdx
            .ratings
            .unwrap_or_default()
            .into_iter()
            .map(|r| Rating {
                severity: r.severity,
                score: r.score,
                method: r.method,
                vector: r.vector,
            })
            .collect(),
        description: cdx.description,
        analysis: cdx.analysis.map(|a| Analysis {
            state: a.state,
            justification: a.justification,
            detail: a.detail,
        }),
        affects: cdx
            .affects
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.ref_field)
            .collect(),
        published: cdx.published,
        updated: cdx.updated,
    }
}

// ============================================================================
// CycloneDX JSON structures for deserialization
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct CycloneDxBom {
    bom_format: Option<String>,
    spec_version: Option<String>,
    serial_number: Option<String>,
    version: Option<u32>,
    metadata: Option<CdxMetadata>,
    components: Option<Vec<CdxComponent>>,
    dependencies: Option<Vec<CdxDependency>>,
    vulnerabilities: Option<Vec<CdxVulnerability>>,
    annotations: Option<Vec<CdxAnnotation>>,
    compositions: Option<Vec<CdxComposition>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxMetadata {
    timestamp: Option<String>,
    /// Either an array (1.4/1.5) or an object with components/services (1.6)
    #[serde(default, deserialize_with = "deserialize_tools")]
    tools: Option<Vec<CdxTool>>,
    authors: Option<Vec<CdxContact>>,
    component: Option<CdxComponent>,
    supplier: Option<CdxOrganization>,
    /// `manufacture` in 1.5, `manufacturer` in 1.6
    #[serde(alias = "manufacture")]
    manufacturer: Option<CdxOrganization>,
    licenses: Option<Vec<CdxLicenseChoice>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxTool {
    vendor: Option<String>,
    name: Option<String>,
    version: Option<String>,
}

/// 1.6 tools object format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxToolsObject {
    components: Option<Vec<CdxToolEntry>>,
    services: Option<Vec<CdxToolEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxToolEntry {
    group: Option<String>,
    publisher: Option<String>,
    name: Option<String>,
    version: Option<String>,
}

/// Accept both the 1.4/1.5 (array) and 1.6 (object) tool formats
fn deserialize_tools<'de, D>(deserializer: D) -> Result<Option<Vec<CdxTool>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    struct ToolsVisitor;

    impl<'de> Visitor<'de> for ToolsVisitor {
        type Value = Option<Vec<CdxTool>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an array of tools or an object with components/services")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut tools = Vec::new();
            while let Some(tool) = seq.next_element::<CdxTool>()? {
                tools.push(tool);
            }
            Ok(Some(tools))
        }

        fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let tools_obj: CdxToolsObject =
                Deserialize::deserialize(de::value::MapAccessDeserializer::new(map))?;

            let tools: Vec<CdxTool> = tools_obj
                .components
                .into_iter()
                .chain(tools_obj.services)
                .flatten()
                .map(|entry| CdxTool {
                    vendor: entry.publisher.or(entry.group),
                    name: entry.name,
                    version: entry.version,
                })
                .collect();

            Ok(if tools.is_empty() { None } else { Some(tools) })
        }
    }

    deserializer.deserialize_any(ToolsVisitor)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxContact {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

impl CdxContact {
    fn into_contact(self) -> Contact {
        Contact {
            name: self.name,
            email: self.email,
            phone: self.phone,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxOrganization {
    name: Option<String>,
    url: Option<Vec<String>>,
    contact: Option<Vec<CdxContact>>,
}

impl CdxOrganization {
    fn into_organization(self) -> Option<Organization> {
        let mut org = Organization::new(self.name?);
        org.urls = self.url.unwrap_or_default();
        org.contacts = self
            .contact
            .unwrap_or_default()
            .into_iter()
            .map(CdxContact::into_contact)
            .collect();
        Some(org)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxComponent {
    #[serde(rename = "type")]
    component_type: Option<String>,
    #[serde(rename = "bom-ref", alias = "bomRef")]
    bom_ref: Option<String>,
    name: Option<String>,
    version: Option<String>,
    group: Option<String>,
    purl: Option<String>,
    cpe: Option<String>,
    description: Option<String>,
    scope: Option<String>,
    supplier: Option<CdxOrganization>,
    licenses: Option<Vec<CdxLicenseChoice>>,
    hashes: Option<Vec<CdxHash>>,
    properties: Option<Vec<CdxProperty>>,
    components: Option<Vec<CdxComponent>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxLicenseChoice {
    license: Option<CdxLicense>,
    expression: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxLicense {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxHash {
    alg: String,
    content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxProperty {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxDependency {
    #[serde(rename = "ref")]
    ref_field: String,
    depends_on: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxVulnerability {
    id: Option<String>,
    source: Option<CdxVulnSource>,
    description: Option<String>,
    ratings: Option<Vec<CdxRating>>,
    affects: Option<Vec<CdxAffects>>,
    analysis: Option<CdxAnalysis>,
    published: Option<String>,
    updated: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxVulnSource {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxRating {
    score: Option<f32>,
    severity: Option<String>,
    method: Option<String>,
    vector: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxAffects {
    #[serde(rename = "ref")]
    ref_field: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxAnalysis {
    state: Option<String>,
    justification: Option<String>,
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxAnnotation {
    #[serde(rename = "bom-ref", alias = "bomRef")]
    bom_ref: Option<String>,
    subjects: Option<Vec<String>>,
    annotator: Option<CdxAnnotator>,
    timestamp: Option<String>,
    text: Option<String>,
}

/// Annotator is exactly one of organization, individual, component or service
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxAnnotator {
    organization: Option<CdxNamed>,
    individual: Option<CdxNamed>,
    component: Option<CdxNamed>,
    service: Option<CdxNamed>,
}

impl CdxAnnotator {
    fn display_name(self) -> Option<String> {
        [self.organization, self.individual, self.component, self.service]
            .into_iter()
            .flatten()
            .find_map(|named| named.name)
    }
}

#[derive(Debug, Deserialize)]
struct CdxNamed {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxComposition {
    aggregate: Option<String>,
    assemblies: Option<Vec<String>>,
    dependencies: Option<Vec<String>>,
}
