//! # Easing Registry
//!
//! The immutable catalog of easing functions: display metadata, default
//! parameters and the ScriptMapper compatibility table.
//!
//! Build one with [`EasingRegistry::builtin`] and pass it by reference, or use
//! the lazily initialised [`EasingRegistry::global`].

use crate::easing;
use scriptcam_data::{DriftParams, EaseType, FunctionId};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Catalog entry for one easing curve.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EasingFunctionInfo {
    pub id: FunctionId,
    pub name: &'static str,
    pub formula: &'static str,
    pub is_parametric: bool,
    pub default_params: Option<DriftParams>,
    pub script_mapper_compatible: bool,
    pub script_mapper_name: Option<&'static str>,
}

impl EasingFunctionInfo {
    fn new(id: FunctionId, name: &'static str, formula: &'static str) -> Self {
        Self {
            is_parametric: id.is_parametric(),
            id,
            name,
            formula,
            default_params: None,
            script_mapper_compatible: false,
            script_mapper_name: None,
        }
    }

    fn script_mapper(mut self, base_name: &'static str) -> Self {
        self.script_mapper_compatible = true;
        self.script_mapper_name = Some(base_name);
        self
    }

    fn params(mut self, params: DriftParams) -> Self {
        self.default_params = Some(params);
        self
    }

    pub fn calculate(&self, t: f64, ease_type: EaseType, params: Option<DriftParams>) -> f64 {
        easing::calculate(&self.id, t, ease_type, params.or(self.default_params))
    }
}

static REGISTRY: OnceLock<EasingRegistry> = OnceLock::new();

pub struct EasingRegistry {
    functions: Vec<EasingFunctionInfo>,
    by_id: HashMap<FunctionId, usize>,
    by_script_mapper_name: HashMap<&'static str, usize>,
}

impl EasingRegistry {
    /// Get the shared registry instance.
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(Self::builtin)
    }

    pub fn builtin() -> Self {
        let functions = vec![
            EasingFunctionInfo::new(FunctionId::Linear, "Linear", "f(t) = t"),
            EasingFunctionInfo::new(FunctionId::Quadratic, "Quadratic", "f(t) = t²")
                .script_mapper("Quad"),
            EasingFunctionInfo::new(FunctionId::Cubic, "Cubic", "f(t) = t³")
                .script_mapper("Cubic"),
            EasingFunctionInfo::new(FunctionId::Quartic, "Quartic", "f(t) = t⁴")
                .script_mapper("Quart"),
            EasingFunctionInfo::new(FunctionId::Quintic, "Quintic", "f(t) = t⁵")
                .script_mapper("Quint"),
            EasingFunctionInfo::new(
                FunctionId::Exponential,
                "Exponential",
                "f(t) = 2^(10t - 10)",
            )
            .script_mapper("Expo"),
            EasingFunctionInfo::new(FunctionId::Circular, "Circular", "f(t) = 1 - √(1 - t²)")
                .script_mapper("Circ"),
            EasingFunctionInfo::new(FunctionId::Sqrt, "Square Root", "f(t) = 1 - √(1 - t)"),
            EasingFunctionInfo::new(FunctionId::Back, "Back", "f(t) = 2.70158t³ - 1.70158t²")
                .script_mapper("Back"),
            EasingFunctionInfo::new(
                FunctionId::Elastic,
                "Elastic",
                "f(t) = -2^(10t - 10) · sin((10t - 10.75) · 2π/3)",
            )
            .script_mapper("Elastic"),
            EasingFunctionInfo::new(FunctionId::Bounce, "Bounce", "f(t) = 1 - bounceOut(1 - t)")
                .script_mapper("Bounce"),
            EasingFunctionInfo::new(FunctionId::Hermite, "Hermite", "f(t) = t²(3 - 2t)"),
            EasingFunctionInfo::new(
                FunctionId::Bezier,
                "Bezier",
                "cubic-bezier(0.42, 0, 1, 1)",
            ),
            EasingFunctionInfo::new(FunctionId::Parabolic, "Parabolic", "f(t) = 4t(1 - t)"),
            EasingFunctionInfo::new(
                FunctionId::Trigonometric,
                "Trigonometric",
                "f(t) = 1 - cos(tπ/2)",
            )
            .script_mapper("Sine"),
            EasingFunctionInfo::new(
                FunctionId::Drift,
                "Drift",
                "t < x: (t/x)² · y, else y + (t - x)/(1 - x) · (1 - y)",
            )
            .script_mapper("Drift")
            .params(DriftParams::default()),
        ];

        let by_id = functions
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();
        let by_script_mapper_name = functions
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.script_mapper_name.map(|name| (name, i)))
            .collect();

        Self {
            functions,
            by_id,
            by_script_mapper_name,
        }
    }

    pub fn get(&self, id: &FunctionId) -> Option<&EasingFunctionInfo> {
        self.by_id.get(id).map(|&i| &self.functions[i])
    }

    /// Lookup by ScriptMapper base name (`Quad`, `Sine`, ...). Case-sensitive.
    pub fn by_script_mapper_name(&self, name: &str) -> Option<&EasingFunctionInfo> {
        self.by_script_mapper_name
            .get(name)
            .map(|&i| &self.functions[i])
    }

    pub fn script_mapper_name(&self, id: &FunctionId) -> Option<&'static str> {
        self.get(id).and_then(|f| f.script_mapper_name)
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &EasingFunctionInfo> {
        self.functions.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Evaluates `id`, falling back to linear for ids the catalog does not know.
    pub fn calculate(
        &self,
        id: &FunctionId,
        t: f64,
        ease_type: EaseType,
        params: Option<DriftParams>,
    ) -> f64 {
        match self.get(id) {
            Some(info) => info.calculate(t, ease_type, params),
            None => {
                tracing::debug!("Unknown easing function '{}', evaluating as linear", id);
                t
            }
        }
    }
}

impl Default for EasingRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
