//! The fixed catalog of NetQoS query tools.

use serde_json::json;

use super::QosTool;

/// Location hierarchy queries.
pub struct LocationsTool;

#[async_trait::async_trait]
impl QosTool for LocationsTool {
    fn name(&self) -> &'static str {
        "get_locations"
    }

    fn description(&self) -> &'static str {
        "Fetch locations (provinces, districts, etc.) without geographic polygons"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "level": {
                    "type": "number",
                    "description": "Hierarchy level: 0=Country, 1=Province, 2=District"
                },
                "search": {
                    "type": "string",
                    "description": "Free-text search"
                },
                "with_stats": {
                    "type": "boolean",
                    "description": "Include aggregate statistics"
                }
            }
        })
    }

    fn endpoint(&self) -> &'static str {
        "locations"
    }
}

/// Quality-of-service KPI measurements.
pub struct KpiDataTool;

#[async_trait::async_trait]
impl QosTool for KpiDataTool {
    fn name(&self) -> &'static str {
        "get_kpi_data"
    }

    fn description(&self) -> &'static str {
        "Fetch quality-of-service KPI measurements"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "location_id": { "type": "number" },
                "network": { "type": "string", "enum": ["2g", "3g", "4g", "5g"] },
                "latest_only": { "type": "boolean" }
            }
        })
    }

    fn endpoint(&self) -> &'static str {
        "kpi-data"
    }
}

/// Operator scoring.
pub struct ScoringTool;

#[async_trait::async_trait]
impl QosTool for ScoringTool {
    fn name(&self) -> &'static str {
        "get_scoring"
    }

    fn description(&self) -> &'static str {
        "Fetch operator quality scores"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "network": { "type": "string", "enum": ["2g", "3g", "4g", "5g"] },
                "with_rankings": { "type": "boolean" }
            }
        })
    }

    fn endpoint(&self) -> &'static str {
        "scoring"
    }
}

/// Telecom operator directory.
pub struct OperatorsTool;

#[async_trait::async_trait]
impl QosTool for OperatorsTool {
    fn name(&self) -> &'static str {
        "get_operators"
    }

    fn description(&self) -> &'static str {
        "List telecom operators"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "type": { "type": "string", "enum": ["mobile", "fixed", "isp"] },
                "with_stats": { "type": "boolean" }
            }
        })
    }

    fn endpoint(&self) -> &'static str {
        "operators"
    }
}

/// Coverage statistics.
pub struct CoverageTool;

#[async_trait::async_trait]
impl QosTool for CoverageTool {
    fn name(&self) -> &'static str {
        "get_coverage"
    }

    fn description(&self) -> &'static str {
        "Fetch network coverage statistics"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "location_id": { "type": "number" },
                "network": { "type": "string", "enum": ["2g", "3g", "4g", "5g"] }
            }
        })
    }

    fn endpoint(&self) -> &'static str {
        "coverage"
    }
}

/// Cross-cutting analytics.
pub struct AnalyticsTool;

#[async_trait::async_trait]
impl QosTool for AnalyticsTool {
    fn name(&self) -> &'static str {
        "get_analytics"
    }

    fn description(&self) -> &'static str {
        "Fetch aggregate analytics across operators, locations, and networks"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "scope": {
                    "type": "string",
                    "enum": ["global", "operator", "location", "network"]
                },
                "period": {
                    "type": "string",
                    "enum": ["last_7_days", "last_30_days", "last_3_months"]
                }
            }
        })
    }

    fn endpoint(&self) -> &'static str {
        "analytics"
    }
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn QosTool>> {
    vec![
        Box::new(LocationsTool),
        Box::new(KpiDataTool),
        Box::new(ScoringTool),
        Box::new(OperatorsTool),
        Box::new(CoverageTool),
        Box::new(AnalyticsTool),
    ]
}
