//! Method dispatch
//!
//! Methods:
//! - ping: liveness check
//! - quantities: list registered quantities
//! - units: units of one quantity
//! - convert: "5 km -> mi" style conversion
//! - multiply / divide / reciprocal: dimensional algebra
//! - dimension: dimension of a quantity or of an SI unit string
//! - parse: parse a value, localized when a locale is given
//! - define_unit / remove_unit: runtime unit management

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::debug;
use unitas_core::{DimensionFormat, DimensionVector, SiPrefixes, UnitSystem};
use unitas_units::{
    parse_conversion, parse_scalar, LocaleCatalogue, Localizer, Measure, QuantitySummary, Scalar,
    SiScalar, UnitDef, UnitRegistry, UnitSummary,
};

use crate::protocol::{codes, Request, Response, RpcError};

pub struct Server {
    registry: UnitRegistry,
    catalogue: LocaleCatalogue,
}

impl Server {
    pub fn new(registry: UnitRegistry, catalogue: LocaleCatalogue) -> Self {
        Server { registry, catalogue }
    }

    pub fn handle_request(&self, request: &Request) -> Response {
        debug!(method = %request.method, "processing request");
        let result = match request.method.as_str() {
            "ping" => Ok(json!({})),
            "quantities" => self.quantities(),
            "units" => params(request).and_then(|p| self.units(p)),
            "convert" => params(request).and_then(|p| self.convert(p)),
            "multiply" => params(request).and_then(|p| self.binary(p, Operation::Multiply)),
            "divide" => params(request).and_then(|p| self.binary(p, Operation::Divide)),
            "reciprocal" => params(request).and_then(|p| self.reciprocal(p)),
            "dimension" => params(request).and_then(|p| self.dimension(p)),
            "parse" => params(request).and_then(|p| self.parse(p)),
            "define_unit" => params(request).and_then(|p| self.define_unit(p)),
            "remove_unit" => params(request).and_then(|p| self.remove_unit(p)),
            _ => Err(RpcError::new(
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            )),
        };

        match result {
            Ok(r) => Response::ok(request.id.clone(), r),
            Err(e) => {
                debug!(method = %request.method, code = %e.code, "request failed");
                Response::err(request.id.clone(), e)
            }
        }
    }

    fn localizer(&self, locale: Option<&str>) -> Localizer<'_> {
        match locale {
            Some(locale) => Localizer::new(&self.registry, &self.catalogue, locale),
            None => Localizer::with_default_locale(&self.registry, &self.catalogue),
        }
    }

    // ========== Inspection ==========

    fn quantities(&self) -> Result<JsonValue, RpcError> {
        let quantities: Vec<JsonValue> = self
            .registry
            .quantities()
            .iter()
            .map(|q| {
                json!({
                    "name": q.name(),
                    "dimension": q.dimension().to_string(),
                    "relative": q.relative().map(|r| r.name().to_string()),
                    "standard_unit": q.standard_unit().key(),
                    "units": q.len(),
                })
            })
            .collect();
        Ok(json!({ "quantities": quantities }))
    }

    fn units(&self, p: QuantityParams) -> Result<JsonValue, RpcError> {
        let quantity = self.registry.quantity(&p.quantity)?;
        to_json(&QuantitySummary::of(&quantity))
    }

    fn dimension(&self, p: DimensionParams) -> Result<JsonValue, RpcError> {
        let dimension = match (&p.quantity, &p.dimension) {
            (Some(quantity), _) => self.registry.quantity(quantity)?.dimension(),
            (None, Some(text)) => text.parse::<DimensionVector>()?,
            (None, None) => {
                return Err(RpcError::invalid_params(
                    "dimension requires 'quantity' or 'dimension'",
                ))
            }
        };
        Ok(json!({
            "dimension": dimension.to_string(),
            "si_unit": dimension.to_canonical_string(&DimensionFormat::SI_UNIT),
            "exponents": dimension.exponents(),
            "quantity": self.registry.lookup_by_dimension(dimension).map(|q| q.name().to_string()),
        }))
    }

    // ========== Values ==========

    fn convert(&self, p: ConvertParams) -> Result<JsonValue, RpcError> {
        let (from, to) = match &p.to {
            Some(to) => (p.value.as_str(), to.as_str()),
            None => parse_conversion(&p.value).ok_or_else(|| {
                RpcError::invalid_params(format!(
                    "cannot read '{}' as a conversion, expected '<value> -> <unit>'",
                    p.value
                ))
            })?,
        };
        let localizer = self.localizer(p.locale.as_deref());
        let value = localizer.parse(&p.quantity, from)?;
        let target = localizer.resolve(&p.quantity, to)?;
        let converted = value.in_unit(&target)?;
        Ok(measure_json(&converted, &localizer))
    }

    fn parse(&self, p: ParseParams) -> Result<JsonValue, RpcError> {
        let localizer = self.localizer(p.locale.as_deref());
        match &p.quantity {
            Some(quantity) => Ok(measure_json(&localizer.parse(quantity, &p.text)?, &localizer)),
            None => Ok(scalar_json(&parse_scalar(&self.registry, &p.text)?, &localizer)),
        }
    }

    // ========== Algebra ==========

    fn binary(&self, p: BinaryParams, operation: Operation) -> Result<JsonValue, RpcError> {
        let localizer = self.localizer(p.locale.as_deref());
        let lhs = self.operand(&p.lhs, &localizer)?;
        let rhs = self.operand(&p.rhs, &localizer)?;
        let resolver = self.registry.resolver();

        let result = match (operation, &p.expect) {
            (Operation::Multiply, None) => resolver.multiply(&lhs, &rhs)?,
            (Operation::Divide, None) => resolver.divide(&lhs, &rhs)?,
            (Operation::Multiply, Some(expected)) => {
                Scalar::Named(resolver.multiply_as(&lhs, &rhs, expected)?)
            }
            (Operation::Divide, Some(expected)) => {
                Scalar::Named(resolver.divide_as(&lhs, &rhs, expected)?)
            }
        };
        Ok(scalar_json(&result, &localizer))
    }

    fn reciprocal(&self, p: UnaryParams) -> Result<JsonValue, RpcError> {
        let localizer = self.localizer(p.locale.as_deref());
        let operand = self.operand(&p.operand, &localizer)?;
        let result = self.registry.resolver().reciprocal(&operand)?;
        let result = match &p.expect {
            Some(expected) => Scalar::Named(result.coerce(expected)?),
            None => result,
        };
        Ok(scalar_json(&result, &localizer))
    }

    fn operand(&self, param: &OperandParam, localizer: &Localizer<'_>) -> Result<Scalar, RpcError> {
        match param {
            OperandParam::Number(value) => {
                Ok(Scalar::Raw(SiScalar::new(*value, DimensionVector::DIMENSIONLESS)))
            }
            OperandParam::Measure { quantity, value } => {
                Ok(Scalar::Named(localizer.parse(quantity, value)?))
            }
            OperandParam::Si { si } => Ok(parse_scalar(&self.registry, si)?),
        }
    }

    // ========== Registry management ==========

    fn define_unit(&self, p: DefineUnitParams) -> Result<JsonValue, RpcError> {
        let abbreviations: Vec<&str> = p.abbreviations.iter().map(String::as_str).collect();
        let name = p.name.as_deref().unwrap_or(&p.key);
        let mut def = UnitDef::new(&p.key, name, p.system.unwrap_or(UnitSystem::Other))
            .abbreviations(&abbreviations)
            .si_prefixes(p.si_prefixes, p.prefix_power.unwrap_or(1.0));
        def = match p.offset {
            Some(offset) => def.offset(p.factor, offset),
            None => def.factor(p.factor),
        };
        if let Some(relative) = &p.relative {
            def = def.relative(relative);
        }

        let unit = self.registry.define_unit(&p.quantity, def)?;
        to_json(&UnitSummary::of(&unit))
    }

    fn remove_unit(&self, p: RemoveUnitParams) -> Result<JsonValue, RpcError> {
        let removed = self.registry.unregister_unit(&p.quantity, &p.key)?;
        to_json(&UnitSummary::of(&removed))
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Multiply,
    Divide,
}

// ========== Params ==========

/// A value, a value with a unit, or an SI string such as "9.81 m/s2"
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OperandParam {
    Number(f64),
    Measure { quantity: String, value: String },
    Si { si: String },
}

#[derive(Debug, Deserialize)]
struct QuantityParams {
    quantity: String,
}

#[derive(Debug, Deserialize)]
struct DimensionParams {
    quantity: Option<String>,
    dimension: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConvertParams {
    quantity: String,
    value: String,
    to: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ParseParams {
    quantity: Option<String>,
    text: String,
    locale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BinaryParams {
    lhs: OperandParam,
    rhs: OperandParam,
    expect: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnaryParams {
    operand: OperandParam,
    expect: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DefineUnitParams {
    quantity: String,
    key: String,
    name: Option<String>,
    #[serde(default)]
    abbreviations: Vec<String>,
    #[serde(default = "unit_factor")]
    factor: f64,
    offset: Option<f64>,
    system: Option<UnitSystem>,
    #[serde(default)]
    si_prefixes: SiPrefixes,
    prefix_power: Option<f64>,
    relative: Option<String>,
}

fn unit_factor() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct RemoveUnitParams {
    quantity: String,
    key: String,
}

fn params<T: DeserializeOwned>(request: &Request) -> Result<T, RpcError> {
    let value = request.params.clone().unwrap_or_else(|| json!({}));
    serde_json::from_value(value).map_err(|e| {
        RpcError::invalid_params(format!("Invalid params for {}: {}", request.method, e))
    })
}

// ========== Results ==========

fn measure_json(measure: &Measure, localizer: &Localizer<'_>) -> JsonValue {
    json!({
        "quantity": measure.quantity_name(),
        "value": measure.value(),
        "unit": measure.unit().key(),
        "si": measure.si(),
        "dimension": measure.dimension().to_string(),
        "display": localizer.format(measure),
    })
}

fn scalar_json(scalar: &Scalar, localizer: &Localizer<'_>) -> JsonValue {
    match scalar {
        Scalar::Named(measure) => measure_json(measure, localizer),
        Scalar::Raw(raw) => json!({
            "quantity": null,
            "value": raw.value,
            "unit": raw.unit_string(),
            "si": raw.value,
            "dimension": raw.dimension.to_string(),
            "display": raw.to_string(),
        }),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<JsonValue, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::new(codes::INTERNAL, e.to_string()))
}
