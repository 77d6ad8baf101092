//! Report schema validation
//!
//! The AI reply is untrusted input. Every required section and field is
//! checked against the tables below and coerced to its declared type before
//! the typed report is built. Violations are collected rather than reported
//! one at a time, so a single failure names everything that is missing or
//! mistyped.

use crate::error::{Error, Result};
use crate::types::SolarReport;
use serde_json::{Map, Value};

/// Declared type of a report field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    Number,
    Text,
    Boolean,
    TextList,
}

use FieldType::{Boolean, Number, Text, TextList};

const ROOF_ANALYSIS: &[(&str, FieldType)] = &[
    ("roof_type", Text),
    ("roof_area_sqft", Number),
    ("usable_area_sqft", Number),
    ("orientation", Text),
    ("tilt_angle", Number),
    ("shading_assessment", Text),
    ("obstacles", TextList),
];

const SOLAR_POTENTIAL: &[(&str, FieldType)] = &[
    ("recommended_system_size_kw", Number),
    ("estimated_panels_count", Number),
    ("annual_energy_production_kwh", Number),
    ("capacity_factor", Number),
    ("optimal_panel_type", Text),
];

const FINANCIAL_ANALYSIS: &[(&str, FieldType)] = &[
    ("estimated_system_cost", Number),
    ("cost_per_watt", Number),
    ("annual_savings", Number),
    ("payback_period_years", Number),
    ("roi_percentage", Number),
    ("net_present_value", Number),
];

const INSTALLATION_CONSIDERATIONS: &[(&str, FieldType)] = &[
    ("structural_assessment", Text),
    ("electrical_requirements", Text),
    ("permit_complexity", Text),
    ("installation_timeline", Text),
];

const RECOMMENDATIONS: &[(&str, FieldType)] = &[
    ("proceed_with_installation", Boolean),
    ("priority_improvements", TextList),
    ("alternative_solutions", TextList),
    ("next_steps", TextList),
];

/// Required top-level sections, in report order
const SECTIONS: &[(&str, &[(&str, FieldType)])] = &[
    ("roof_analysis", ROOF_ANALYSIS),
    ("solar_potential", SOLAR_POTENTIAL),
    ("financial_analysis", FINANCIAL_ANALYSIS),
    ("installation_considerations", INSTALLATION_CONSIDERATIONS),
    ("recommendations", RECOMMENDATIONS),
];

/// Validate a parsed candidate object against the report schema.
///
/// Checks section presence, field presence, and type convertibility, in that
/// order, collecting every violation. On success the coerced values are
/// rebuilt into a typed `SolarReport`.
pub fn validate(candidate: &Value) -> Result<SolarReport> {
    let mut violations = Vec::new();

    let root = match candidate.as_object() {
        Some(obj) => obj,
        None => {
            return Err(Error::SchemaValidation {
                violations: vec![format!("report root: expected object, got {}", type_name(candidate))],
            });
        }
    };

    let mut coerced = Map::new();
    for (section_name, fields) in SECTIONS {
        match root.get(*section_name) {
            None => violations.push(format!("{}: missing section", section_name)),
            Some(Value::Object(section)) => {
                let mut out = Map::new();
                for (field, field_type) in *fields {
                    let path = format!("{}.{}", section_name, field);
                    match section.get(*field) {
                        None => violations.push(format!("{}: missing field", path)),
                        Some(value) => match coerce(value, *field_type) {
                            Ok(coerced_value) => {
                                out.insert((*field).to_string(), coerced_value);
                            }
                            Err(problem) => violations.push(format!("{}: {}", path, problem)),
                        },
                    }
                }
                coerced.insert((*section_name).to_string(), Value::Object(out));
            }
            Some(other) => violations.push(format!(
                "{}: expected object, got {}",
                section_name,
                type_name(other)
            )),
        }
    }

    if !violations.is_empty() {
        return Err(Error::SchemaValidation { violations });
    }

    serde_json::from_value(Value::Object(coerced)).map_err(|e| Error::SchemaValidation {
        violations: vec![e.to_string()],
    })
}

/// Coerce a single value to its declared type, or describe why it cannot be.
fn coerce(value: &Value, field_type: FieldType) -> std::result::Result<Value, String> {
    match field_type {
        Number => match value {
            Value::Number(n) if n.as_f64().is_some_and(f64::is_finite) => Ok(value.clone()),
            Value::Number(_) => Err("expected finite number".to_string()),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => serde_json::Number::from_f64(parsed)
                    .map(Value::Number)
                    .ok_or_else(|| "expected finite number".to_string()),
                _ => Err(format!("expected number, got string \"{}\"", s)),
            },
            other => Err(format!("expected number, got {}", type_name(other))),
        },
        Text => match value {
            Value::String(_) => Ok(value.clone()),
            other => Err(format!("expected text, got {}", type_name(other))),
        },
        Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            other => Err(format!("expected boolean, got {}", type_name(other))),
        },
        TextList => match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        return Err(format!(
                            "expected list of text, element [{}] is {}",
                            i,
                            type_name(item)
                        ));
                    }
                }
                Ok(value.clone())
            }
            other => Err(format!("expected list of text, got {}", type_name(other))),
        },
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_report_value() -> Value {
        json!({
            "roof_analysis": {
                "roof_type": "pitched",
                "roof_area_sqft": 1800,
                "usable_area_sqft": 1200,
                "orientation": "south",
                "tilt_angle": 25,
                "shading_assessment": "minimal",
                "obstacles": ["chimney", "vent pipe"]
            },
            "solar_potential": {
                "recommended_system_size_kw": 8.5,
                "estimated_panels_count": 22,
                "annual_energy_production_kwh": 12400,
                "capacity_factor": 16.7,
                "optimal_panel_type": "monocrystalline"
            },
            "financial_analysis": {
                "estimated_system_cost": 21250,
                "cost_per_watt": 2.5,
                "annual_savings": 1860,
                "payback_period_years": 11.4,
                "roi_percentage": 8.8,
                "net_present_value": 9200
            },
            "installation_considerations": {
                "structural_assessment": "suitable",
                "electrical_requirements": "standard interconnection",
                "permit_complexity": "moderate",
                "installation_timeline": "6-8 weeks"
            },
            "recommendations": {
                "proceed_with_installation": true,
                "priority_improvements": ["trim south oak"],
                "alternative_solutions": [],
                "next_steps": ["request quotes"]
            }
        })
    }

    #[test]
    fn test_valid_report_round_trips() {
        let report = validate(&valid_report_value()).unwrap();
        assert_eq!(report.roof_analysis.roof_type, "pitched");
        assert_eq!(report.roof_analysis.roof_area_sqft, 1800.0);
        assert_eq!(report.solar_potential.estimated_panels_count, 22.0);
        assert_eq!(report.financial_analysis.payback_period_years, 11.4);
        assert!(report.recommendations.proceed_with_installation);
        assert_eq!(
            report.roof_analysis.obstacles,
            vec!["chimney".to_string(), "vent pipe".to_string()]
        );
    }

    #[test]
    fn test_missing_section_is_reported_by_path() {
        let mut candidate = valid_report_value();
        candidate.as_object_mut().unwrap().remove("financial_analysis");
        match validate(&candidate) {
            Err(Error::SchemaValidation { violations }) => {
                assert_eq!(violations, vec!["financial_analysis: missing section".to_string()]);
            }
            other => panic!("expected SchemaValidation, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_is_reported_by_path() {
        let mut candidate = valid_report_value();
        candidate["roof_analysis"]
            .as_object_mut()
            .unwrap()
            .remove("tilt_angle");
        match validate(&candidate) {
            Err(Error::SchemaValidation { violations }) => {
                assert_eq!(violations, vec!["roof_analysis.tilt_angle: missing field".to_string()]);
            }
            other => panic!("expected SchemaValidation, got {:?}", other),
        }
    }

    #[test]
    fn test_all_violations_collected() {
        let mut candidate = valid_report_value();
        candidate.as_object_mut().unwrap().remove("recommendations");
        candidate["roof_analysis"]["tilt_angle"] = json!("steep");
        candidate["solar_potential"]
            .as_object_mut()
            .unwrap()
            .remove("capacity_factor");
        match validate(&candidate) {
            Err(Error::SchemaValidation { violations }) => {
                assert_eq!(violations.len(), 3);
                assert!(violations.iter().any(|v| v.starts_with("roof_analysis.tilt_angle:")));
                assert!(violations.iter().any(|v| v.starts_with("solar_potential.capacity_factor:")));
                assert!(violations.iter().any(|v| v.starts_with("recommendations:")));
            }
            other => panic!("expected SchemaValidation, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_string_is_coerced() {
        let mut candidate = valid_report_value();
        candidate["financial_analysis"]["roi_percentage"] = json!("8.8");
        let report = validate(&candidate).unwrap();
        assert_eq!(report.financial_analysis.roi_percentage, 8.8);
    }

    #[test]
    fn test_non_numeric_string_is_a_violation() {
        let mut candidate = valid_report_value();
        candidate["financial_analysis"]["roi_percentage"] = json!("about ten");
        match validate(&candidate) {
            Err(Error::SchemaValidation { violations }) => {
                assert!(violations[0].starts_with("financial_analysis.roi_percentage:"));
            }
            other => panic!("expected SchemaValidation, got {:?}", other),
        }
    }

    #[test]
    fn test_boolean_string_is_coerced() {
        let mut candidate = valid_report_value();
        candidate["recommendations"]["proceed_with_installation"] = json!("True");
        let report = validate(&candidate).unwrap();
        assert!(report.recommendations.proceed_with_installation);
    }

    #[test]
    fn test_non_boolean_is_a_violation() {
        let mut candidate = valid_report_value();
        candidate["recommendations"]["proceed_with_installation"] = json!(1);
        assert!(matches!(
            validate(&candidate),
            Err(Error::SchemaValidation { .. })
        ));
    }

    #[test]
    fn test_list_with_non_string_element_is_a_violation() {
        let mut candidate = valid_report_value();
        candidate["recommendations"]["next_steps"] = json!(["request quotes", 42]);
        match validate(&candidate) {
            Err(Error::SchemaValidation { violations }) => {
                assert!(violations[0].contains("element [1]"));
            }
            other => panic!("expected SchemaValidation, got {:?}", other),
        }
    }

    #[test]
    fn test_section_with_wrong_shape_is_a_violation() {
        let mut candidate = valid_report_value();
        candidate["roof_analysis"] = json!("pitched roof, looks fine");
        match validate(&candidate) {
            Err(Error::SchemaValidation { violations }) => {
                assert_eq!(
                    violations,
                    vec!["roof_analysis: expected object, got string".to_string()]
                );
            }
            other => panic!("expected SchemaValidation, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_root_is_a_violation() {
        assert!(matches!(
            validate(&json!([1, 2, 3])),
            Err(Error::SchemaValidation { .. })
        ));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let mut candidate = valid_report_value();
        candidate["roof_analysis"]["confidence"] = json!(0.9);
        candidate["debug_notes"] = json!("model chatter");
        assert!(validate(&candidate).is_ok());
    }
}
