//! Pipeline orchestration
//!
//! Device configuration text is parsed into segments, one segment is
//! selected, fields are extracted from its instances into records, and the
//! records are checked against the target schema. Uploading validated
//! records goes through [`UploadCoordinator`].

use crate::store::RecordStore;
use crate::upload::{UploadCoordinator, UploadOptions, UploadReport};
use crate::{Error, Result};
use emma_adapter_ios::IosParser;
use emma_adapter_junos::JunosSegmenter;
use emma_extract::{BlockMatches, FieldExtractor, RuleSet, records_from_matches};
use emma_ir::{ParsedConfig, RecordSet, ValidationMessage};
use emma_schema::Schema;
use emma_validation::{AcceptancePolicy, SchemaValidator, StrictnessLevel, ValidationReport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Configuration dialect of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Line-oriented (Cisco IOS style)
    #[default]
    Ios,
    /// Hierarchical (Junos style)
    Junos,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ios => f.write_str("ios"),
            Self::Junos => f.write_str("junos"),
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ios" | "cisco" => Ok(Self::Ios),
            "junos" | "juniper" => Ok(Self::Junos),
            other => Err(Error::pipeline("platform", other, "unknown platform")),
        }
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub platform: Platform,
    /// Acceptance policy for validated records
    pub acceptance_policy: AcceptancePolicy,
    /// Strictness level for validation
    pub strictness: StrictnessLevel,
    /// Add every mandatory and attribute column of the schema to extracted
    /// records before validating them
    pub expose_schema_columns: bool,
    pub upload: UploadOptions,
}

impl PipelineConfig {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            expose_schema_columns: true,
            ..Self::default()
        }
    }
}

/// Results of analysing one segment of one device
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentAnalysis {
    pub hostname: String,
    pub segment: String,
    /// Parsed configuration narrowed to the segment
    pub parsed: ParsedConfig,
    /// Field matches per segment instance
    pub matches: Vec<BlockMatches>,
    pub records: RecordSet,
    pub messages: Vec<ValidationMessage>,
}

impl SegmentAnalysis {
    /// Validation summary of the records
    pub fn report(&self) -> ValidationReport {
        ValidationReport::new(self.messages.clone())
    }
}

/// Config analysis pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    ios: IosParser,
    junos: JunosSegmenter,
    extractor: FieldExtractor,
    schema: Option<Schema>,
    validator: SchemaValidator,
}

impl Pipeline {
    /// Pipeline for a platform with built-in registries and no rules
    pub fn new(platform: Platform) -> Self {
        Self::with_config(PipelineConfig::new(platform))
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            ios: IosParser::new(),
            junos: JunosSegmenter::new(),
            extractor: FieldExtractor::default(),
            schema: None,
            validator: SchemaValidator::new(),
        }
    }

    #[must_use]
    pub fn with_ios_parser(mut self, parser: IosParser) -> Self {
        self.ios = parser;
        self
    }

    #[must_use]
    pub fn with_junos_segmenter(mut self, segmenter: JunosSegmenter) -> Self {
        self.junos = segmenter;
        self
    }

    /// Compile extraction rules; rules that fail to compile are skipped
    #[must_use]
    pub fn with_rules(mut self, rules: &RuleSet) -> Self {
        self.extractor = FieldExtractor::new(rules);
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: SchemaValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Split a configuration into named segments
    pub fn parse(&self, text: &str) -> ParsedConfig {
        match self.config.platform {
            Platform::Ios => self.ios.parse(text),
            Platform::Junos => self.junos.parse(text),
        }
    }

    /// Parse, narrow to `segment`, extract, and validate
    pub fn analyze(&self, hostname: &str, text: &str, segment: &str) -> SegmentAnalysis {
        let parsed = self.parse(text).select(segment);
        let blocks = parsed.get(segment).unwrap_or_default();
        let matches = self.extractor.extract_all(blocks);
        let mut records = records_from_matches(&matches);

        let messages = match &self.schema {
            Some(schema) => {
                if self.config.expose_schema_columns {
                    expose_schema_columns(&mut records, schema);
                }
                self.validator.validate(&records, schema)
            }
            None => Vec::new(),
        };

        info!(
            hostname,
            segment,
            instances = blocks.len(),
            rows = records.len(),
            messages = messages.len(),
            "Analyzed segment"
        );

        SegmentAnalysis {
            hostname: hostname.to_string(),
            segment: segment.to_string(),
            parsed,
            matches,
            records,
            messages,
        }
    }

    /// Analyze devices in input order
    pub fn analyze_devices<H, T>(&self, devices: &[(H, T)], segment: &str) -> Vec<SegmentAnalysis>
    where
        H: AsRef<str>,
        T: AsRef<str>,
    {
        devices
            .iter()
            .map(|(hostname, text)| self.analyze(hostname.as_ref(), text.as_ref(), segment))
            .collect()
    }

    /// Validate records against the pipeline's schema
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSchema`] when no schema is configured.
    pub fn validate(&self, records: &RecordSet) -> Result<ValidationReport> {
        let schema = self.schema.as_ref().ok_or(Error::NoSchema)?;
        Ok(ValidationReport::new(self.validator.validate(records, schema)))
    }

    /// Revalidate `records` and upload them as records of the schema's kind
    /// owned by `hostname`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSchema`] without a schema, and
    /// [`Error::UploadBlocked`] when the acceptance policy refuses the
    /// records. The store is not contacted in either case. Failures of
    /// single rows are reported in the returned [`UploadReport`].
    pub async fn upload<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        records: &RecordSet,
        hostname: &str,
    ) -> Result<UploadReport> {
        let schema = self.schema.as_ref().ok_or(Error::NoSchema)?;
        let report = ValidationReport::new(self.validator.validate(records, schema));
        if report.blocks_upload(self.config.acceptance_policy, self.config.strictness) {
            return Err(Error::UploadBlocked {
                errors: report.error_count(),
                warnings: report.warning_count(),
            });
        }

        Ok(UploadCoordinator::new(store)
            .with_options(self.config.upload.clone())
            .upload(records, schema.kind(), hostname)
            .await)
    }
}

/// Add the schema's mandatory and attribute columns that are missing,
/// filled with nulls
pub fn expose_schema_columns(records: &mut RecordSet, schema: &Schema) -> usize {
    let mut names = schema.mandatory_names();
    for name in schema.attribute_names() {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    let added = records.ensure_columns(names);
    debug!(kind = schema.kind(), added, "Exposed schema columns");
    added
}
