//! The [`Model`] arena: values, generators, and the edges between them.
//!
//! Values and generators are stored in two vectors and addressed by
//! [`ValueId`] and [`GeneratorId`]. A generator's parameter map holds the
//! ids of its inputs; a value's output list holds the ids of the
//! generators consuming it. Neither edge owns anything.

use std::fmt;

use indexmap::IndexMap;
use thicket_core::{
    Datum, DatumKind, GenerateError, GeneratorId, GeneratorInfo, GeneratorKind, ModelError,
    ReturnKind, ValueId, ValueShape,
};
use tracing::{debug, warn};

use crate::generator::{Args, Generator, ModelRng};
use crate::listener::ValueListener;
use crate::traverse::{walk, Order, Visitor};

// ── Slots ──────────────────────────────────────────────────────────

pub(crate) struct ValueSlot {
    pub(crate) name: Option<String>,
    pub(crate) kind: DatumKind,
    pub(crate) datum: Option<Datum>,
    pub(crate) provenance: Option<GeneratorId>,
    pub(crate) outputs: Vec<GeneratorId>,
    pub(crate) listeners: Vec<Box<dyn ValueListener>>,
}

pub(crate) struct GeneratorSlot {
    pub(crate) generator: Box<dyn Generator>,
    pub(crate) params: IndexMap<&'static str, ValueId>,
    pub(crate) output: Option<ValueId>,
}

/// A value produced by a distribution.
///
/// Only [`Model::random_variable`] hands these out, so holding one proves
/// the value's provenance is a distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RandomVariable(ValueId);

impl RandomVariable {
    /// The underlying value id.
    pub fn id(self) -> ValueId {
        self.0
    }
}

impl From<RandomVariable> for ValueId {
    fn from(rv: RandomVariable) -> Self {
        rv.0
    }
}

impl fmt::Display for RandomVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Metadata an external formatter needs to render a named random value.
#[derive(Clone, Debug, PartialEq)]
pub struct LoggableValue<'a> {
    /// The value.
    pub id: ValueId,
    /// Its name.
    pub name: &'a str,
    /// Whether it was drawn directly from a distribution (as opposed to
    /// computed from random inputs).
    pub random_variable: bool,
    /// Column layout.
    pub shape: ValueShape,
}

// ── Model ──────────────────────────────────────────────────────────

/// A generative model: a DAG of values and the generators producing them.
///
/// Values are evaluated lazily. [`sample`](Self::sample) forces every
/// upstream generator whose output is not yet materialized, in post-order,
/// and memoizes the results; nothing is re-evaluated until
/// [`reset`](Self::reset).
#[derive(Default)]
pub struct Model {
    pub(crate) values: Vec<ValueSlot>,
    pub(crate) generators: Vec<GeneratorSlot>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("values", &self.values.len())
            .field("generators", &self.generators.len())
            .finish()
    }
}

impl Model {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of values.
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Number of generators.
    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    pub(crate) fn value_slot(&self, id: ValueId) -> Result<&ValueSlot, ModelError> {
        self.values
            .get(id.get())
            .ok_or(ModelError::UnknownValue { id })
    }

    fn value_slot_mut(&mut self, id: ValueId) -> Result<&mut ValueSlot, ModelError> {
        self.values
            .get_mut(id.get())
            .ok_or(ModelError::UnknownValue { id })
    }

    pub(crate) fn generator_slot(&self, id: GeneratorId) -> Result<&GeneratorSlot, ModelError> {
        self.generators
            .get(id.get())
            .ok_or(ModelError::UnknownGenerator { id })
    }

    fn push_value(
        &mut self,
        name: Option<&str>,
        kind: DatumKind,
        datum: Option<Datum>,
        provenance: Option<GeneratorId>,
    ) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(ValueSlot {
            name: name.map(str::to_string),
            kind,
            datum,
            provenance,
            outputs: Vec::new(),
            listeners: Vec::new(),
        });
        id
    }

    // ── Construction ───────────────────────────────────────────────

    /// Add a named constant.
    pub fn constant(&mut self, name: &str, datum: impl Into<Datum>) -> ValueId {
        let datum = datum.into();
        self.push_value(Some(name), datum.kind(), Some(datum), None)
    }

    /// Add an anonymous constant. It is written inline in generated code.
    pub fn anonymous(&mut self, datum: impl Into<Datum>) -> ValueId {
        let datum = datum.into();
        self.push_value(None, datum.kind(), Some(datum), None)
    }

    /// Add a generator with no parameters bound.
    pub fn add_generator<G: Generator>(&mut self, generator: G) -> GeneratorId {
        self.add_boxed(Box::new(generator))
    }

    /// Add an already boxed generator, e.g. one created by a
    /// [`Registry`](crate::Registry).
    pub fn add_boxed(&mut self, generator: Box<dyn Generator>) -> GeneratorId {
        let id = GeneratorId(self.generators.len() as u32);
        self.generators.push(GeneratorSlot {
            generator,
            params: IndexMap::new(),
            output: None,
        });
        id
    }

    /// Add a generator, bind `inputs`, and validate the bindings.
    ///
    /// # Errors
    ///
    /// Any error from [`set_input`](Self::set_input) or
    /// [`validate`](Self::validate).
    pub fn generator<G: Generator>(
        &mut self,
        generator: G,
        inputs: &[(&str, ValueId)],
    ) -> Result<GeneratorId, ModelError> {
        let id = self.add_generator(generator);
        for &(name, value) in inputs {
            self.set_input(id, name, value)?;
        }
        self.validate(id)?;
        Ok(id)
    }

    /// Bind an existing value to a parameter, replacing any previous
    /// binding.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownParameter`] if the generator does not declare
    /// `name`, [`ModelError::ParameterKind`] if the parameter does not
    /// accept the value's kind, and [`ModelError::Cycle`] if the value
    /// depends on this generator's output.
    pub fn set_input(
        &mut self,
        generator: GeneratorId,
        name: &str,
        value: ValueId,
    ) -> Result<(), ModelError> {
        let kind = self.value_slot(value)?.kind;
        let slot = self.generator_slot(generator)?;
        let info = slot.generator.info();
        let param = info.param(name).ok_or_else(|| ModelError::UnknownParameter {
            generator: info.name.to_string(),
            name: name.to_string(),
        })?;
        if !param.kind.accepts(kind) {
            return Err(ModelError::ParameterKind {
                generator: info.name.to_string(),
                name: name.to_string(),
                expected: param.kind.to_string(),
                actual: kind,
            });
        }
        if let Some(output) = slot.output {
            if self.depends_on(value, output)? {
                return Err(ModelError::Cycle { value });
            }
        }

        let key = param.name;
        let slot = &mut self.generators[generator.get()];
        let previous = slot.params.insert(key, value);
        slot.params
            .sort_by(|a, _, b, _| info.position(a).cmp(&info.position(b)));
        if let Some(old) = previous {
            if old != value && !slot.params.values().any(|&v| v == old) {
                self.values[old.get()].outputs.retain(|&g| g != generator);
            }
        }
        let outputs = &mut self.values[value.get()].outputs;
        if !outputs.contains(&generator) {
            outputs.push(generator);
        }
        Ok(())
    }

    /// Bind a new anonymous constant holding `datum` to a parameter.
    pub fn set_param(
        &mut self,
        generator: GeneratorId,
        name: &str,
        datum: impl Into<Datum>,
    ) -> Result<ValueId, ModelError> {
        self.generator_slot(generator)?;
        let value = self.anonymous(datum);
        self.set_input(generator, name, value)?;
        Ok(value)
    }

    /// Check that every required parameter is bound and let the generator
    /// check the payloads already available.
    pub fn validate(&self, generator: GeneratorId) -> Result<(), ModelError> {
        let slot = self.generator_slot(generator)?;
        let info = slot.generator.info();
        if let Some(missing) = info.required().find(|p| !slot.params.contains_key(p.name)) {
            return Err(ModelError::MissingParameter {
                generator: info.name.to_string(),
                name: missing.name.to_string(),
            });
        }
        let args = self.args(slot);
        slot.generator
            .validate(&args)
            .map_err(|e| generator_error(info, e))
    }

    /// Create the output value of a generator.
    ///
    /// Its kind comes from the generator's [`ReturnKind`]. Pass `None` for
    /// an anonymous value, which generated code writes inline.
    ///
    /// # Errors
    ///
    /// [`ModelError::AlreadyDerived`] if the generator already has an
    /// output; [`ModelError::MissingParameter`] if the return kind follows
    /// a parameter that is unbound.
    pub fn derive(
        &mut self,
        generator: GeneratorId,
        name: Option<&str>,
    ) -> Result<ValueId, ModelError> {
        let slot = self.generator_slot(generator)?;
        let info = slot.generator.info();
        if let Some(value) = slot.output {
            return Err(ModelError::AlreadyDerived {
                generator: info.name.to_string(),
                value,
            });
        }
        let kind = match info.returns {
            ReturnKind::Fixed(kind) => kind,
            ReturnKind::SameAs(param) => {
                let value = slot.params.get(param).copied().ok_or_else(|| {
                    ModelError::MissingParameter {
                        generator: info.name.to_string(),
                        name: param.to_string(),
                    }
                })?;
                self.value_slot(value)?.kind
            }
        };
        let id = self.push_value(name, kind, None, Some(generator));
        self.generators[generator.get()].output = Some(id);
        Ok(id)
    }

    /// Create the output of a distribution as a [`RandomVariable`].
    ///
    /// # Errors
    ///
    /// [`ModelError::NotADistribution`] for a function, plus anything
    /// [`derive`](Self::derive) reports.
    pub fn random_variable(
        &mut self,
        generator: GeneratorId,
        name: Option<&str>,
    ) -> Result<RandomVariable, ModelError> {
        let info = self.generator_slot(generator)?.generator.info();
        if info.kind != GeneratorKind::Distribution {
            return Err(ModelError::NotADistribution {
                generator: info.name.to_string(),
            });
        }
        self.derive(generator, name).map(RandomVariable)
    }

    /// Attach a listener to a value.
    pub fn add_listener(
        &mut self,
        value: ValueId,
        listener: Box<dyn ValueListener>,
    ) -> Result<(), ModelError> {
        self.value_slot_mut(value)?.listeners.push(listener);
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────

    /// Descriptor of a generator.
    pub fn info(&self, generator: GeneratorId) -> Result<&'static GeneratorInfo, ModelError> {
        Ok(self.generator_slot(generator)?.generator.info())
    }

    /// Parameter bindings of a generator, in declaration order.
    pub fn params(
        &self,
        generator: GeneratorId,
    ) -> Result<&IndexMap<&'static str, ValueId>, ModelError> {
        Ok(&self.generator_slot(generator)?.params)
    }

    /// The value bound to one parameter, if any.
    pub fn param_value(
        &self,
        generator: GeneratorId,
        name: &str,
    ) -> Result<Option<ValueId>, ModelError> {
        Ok(self.generator_slot(generator)?.params.get(name).copied())
    }

    /// The output value of a generator, once derived.
    pub fn output(&self, generator: GeneratorId) -> Result<Option<ValueId>, ModelError> {
        Ok(self.generator_slot(generator)?.output)
    }

    /// Name of a value; `None` for anonymous values.
    pub fn name(&self, value: ValueId) -> Result<Option<&str>, ModelError> {
        Ok(self.value_slot(value)?.name.as_deref())
    }

    /// The fixed kind of a value.
    pub fn kind(&self, value: ValueId) -> Result<DatumKind, ModelError> {
        Ok(self.value_slot(value)?.kind)
    }

    /// The payload of a value.
    ///
    /// # Errors
    ///
    /// [`ModelError::NotMaterialized`] if it has not been generated.
    pub fn value(&self, value: ValueId) -> Result<&Datum, ModelError> {
        self.value_slot(value)?
            .datum
            .as_ref()
            .ok_or(ModelError::NotMaterialized { value })
    }

    /// Whether a value currently has a payload.
    pub fn is_materialized(&self, value: ValueId) -> Result<bool, ModelError> {
        Ok(self.value_slot(value)?.datum.is_some())
    }

    /// Generators consuming a value.
    pub fn outputs(&self, value: ValueId) -> Result<&[GeneratorId], ModelError> {
        Ok(&self.value_slot(value)?.outputs)
    }

    /// The generator that produces a value; `None` for constants.
    pub fn provenance(&self, value: ValueId) -> Result<Option<GeneratorId>, ModelError> {
        Ok(self.value_slot(value)?.provenance)
    }

    /// Whether a value is produced directly by a distribution.
    pub fn is_random_variable(&self, value: ValueId) -> Result<bool, ModelError> {
        match self.value_slot(value)?.provenance {
            Some(g) => Ok(self.generator_slot(g)?.generator.info().kind
                == GeneratorKind::Distribution),
            None => Ok(false),
        }
    }

    /// Whether a value is random: it is a random variable or depends,
    /// through any chain of parameters, on one.
    pub fn is_random(&self, value: ValueId) -> Result<bool, ModelError> {
        let mut finder = RandomFinder { found: false };
        walk(self, value, Order::Pre, &mut finder)?;
        Ok(finder.found)
    }

    /// Whether any parameter of a generator is random.
    pub fn has_random_parameters(&self, generator: GeneratorId) -> Result<bool, ModelError> {
        for &value in self.generator_slot(generator)?.params.values() {
            if self.is_random(value)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether `value` is `target` or depends on it through parameters.
    pub fn depends_on(&self, value: ValueId, target: ValueId) -> Result<bool, ModelError> {
        self.value_slot(target)?;
        let mut finder = ValueFinder {
            target,
            found: false,
        };
        walk(self, value, Order::Pre, &mut finder)?;
        Ok(finder.found)
    }

    /// Named random values with a payload, in creation order.
    pub fn loggable_values(&self) -> Result<Vec<LoggableValue<'_>>, ModelError> {
        let mut out = Vec::new();
        for (i, slot) in self.values.iter().enumerate() {
            let id = ValueId(i as u32);
            let (Some(name), Some(datum)) = (slot.name.as_deref(), slot.datum.as_ref()) else {
                continue;
            };
            if !self.is_random(id)? {
                continue;
            }
            out.push(LoggableValue {
                id,
                name,
                random_variable: self.is_random_variable(id)?,
                shape: datum.shape(),
            });
        }
        Ok(out)
    }

    // ── Evaluation ─────────────────────────────────────────────────

    pub(crate) fn args<'a>(&'a self, slot: &GeneratorSlot) -> Args<'a> {
        let mut args = Args::new(slot.generator.info().name);
        for (&name, &value) in &slot.params {
            args.bind(name, self.values[value.get()].datum.as_ref());
        }
        args
    }

    /// Replace the payload of a value and notify its listeners.
    ///
    /// Setting a generated value clamps it: sampling will not overwrite
    /// it until [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// [`ModelError::TypeMismatch`] if `datum` has a different kind.
    pub fn set_value(&mut self, value: ValueId, datum: impl Into<Datum>) -> Result<(), ModelError> {
        let datum = datum.into();
        let slot = self.value_slot_mut(value)?;
        if datum.kind() != slot.kind {
            return Err(ModelError::TypeMismatch {
                value,
                expected: slot.kind,
                actual: datum.kind(),
            });
        }
        store(slot, value, datum);
        Ok(())
    }

    /// Materialize a value, generating everything upstream of it that has
    /// no payload yet.
    ///
    /// Generators run in post-order: every parameter is materialized before
    /// the generator that reads it. Each generator runs at most once per
    /// materialization.
    pub fn sample(
        &mut self,
        value: impl Into<ValueId>,
        rng: &mut ModelRng,
    ) -> Result<&Datum, ModelError> {
        let value = value.into();
        let mut plan = Plan::default();
        walk(self, value, Order::Post, &mut plan)?;
        for generator in plan.generators {
            self.evaluate(generator, rng)?;
        }
        self.value(value)
    }

    fn evaluate(&mut self, generator: GeneratorId, rng: &mut ModelRng) -> Result<(), ModelError> {
        let slot = self.generator_slot(generator)?;
        let info = slot.generator.info();
        let Some(output) = slot.output else {
            return Ok(());
        };
        if self.values[output.get()].datum.is_some() {
            return Ok(());
        }
        for (&name, &value) in &slot.params {
            if self.values[value.get()].datum.is_none() {
                debug!(generator = info.name, param = name, %value, "parameter not materialized");
                return Err(ModelError::NotMaterialized { value });
            }
        }
        let args = self.args(slot);
        slot.generator
            .validate(&args)
            .map_err(|e| generator_error(info, e))?;
        let datum = slot
            .generator
            .generate(&args, rng)
            .map_err(|e| generator_error(info, e))?;
        debug!(generator = info.name, %output, kind = %datum.kind(), "generated");

        let out = &mut self.values[output.get()];
        if datum.kind() != out.kind {
            return Err(ModelError::TypeMismatch {
                value: output,
                expected: out.kind,
                actual: datum.kind(),
            });
        }
        store(out, output, datum);
        Ok(())
    }

    /// Log density of a random variable's payload under its distribution.
    ///
    /// # Errors
    ///
    /// [`ModelError::NoProvenance`] for constants,
    /// [`ModelError::NotADistribution`] for function outputs,
    /// [`ModelError::NotMaterialized`] if the value or a parameter has no
    /// payload, and [`ModelError::Generator`] wrapping
    /// [`GenerateError::Unsupported`] when the distribution has no density.
    pub fn log_density(&self, value: impl Into<ValueId>) -> Result<f64, ModelError> {
        let value = value.into();
        let generator = self
            .value_slot(value)?
            .provenance
            .ok_or(ModelError::NoProvenance { value })?;
        let slot = self.generator_slot(generator)?;
        let info = slot.generator.info();
        if info.kind != GeneratorKind::Distribution {
            return Err(ModelError::NotADistribution {
                generator: info.name.to_string(),
            });
        }
        let datum = self.value(value)?;
        for &param in slot.params.values() {
            if self.values[param.get()].datum.is_none() {
                return Err(ModelError::NotMaterialized { value: param });
            }
        }
        let args = self.args(slot);
        slot.generator.log_density(&args, datum).map_err(|e| {
            if let GenerateError::Unsupported { .. } = e {
                warn!(generator = info.name, %value, "density not available");
            }
            generator_error(info, e)
        })
    }

    /// Forget every generated payload. Constants keep their values.
    pub fn reset(&mut self) {
        for slot in &mut self.values {
            if slot.provenance.is_some() {
                slot.datum = None;
            }
        }
    }
}

fn store(slot: &mut ValueSlot, id: ValueId, datum: Datum) {
    for listener in &mut slot.listeners {
        listener.value_set(id, &datum);
    }
    slot.datum = Some(datum);
}

fn generator_error(info: &GeneratorInfo, reason: GenerateError) -> ModelError {
    ModelError::Generator {
        name: info.name.to_string(),
        reason,
    }
}

// ── Visitors used by the model itself ──────────────────────────────

#[derive(Default)]
struct Plan {
    generators: Vec<GeneratorId>,
}

impl Visitor for Plan {
    fn visit_generator(&mut self, _model: &Model, id: GeneratorId) -> Result<(), ModelError> {
        self.generators.push(id);
        Ok(())
    }
}

struct RandomFinder {
    found: bool,
}

impl Visitor for RandomFinder {
    fn visit_value(&mut self, model: &Model, id: ValueId) -> Result<(), ModelError> {
        if !self.found && model.is_random_variable(id)? {
            self.found = true;
        }
        Ok(())
    }
}

struct ValueFinder {
    target: ValueId,
    found: bool,
}

impl Visitor for ValueFinder {
    fn visit_value(&mut self, _model: &Model, id: ValueId) -> Result<(), ModelError> {
        self.found |= id == self.target;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use thicket_core::{ParamInfo, ParamKind};

    // Minimal local generators; the shared mocks live in
    // thicket-test-utils and are used by the integration tests.

    struct Draw;

    static DRAW: GeneratorInfo = GeneratorInfo {
        name: "Draw",
        kind: GeneratorKind::Distribution,
        description: "uniform draw scaled by `scale`",
        params: &[ParamInfo::required("scale", ParamKind::Number, "scale")],
        returns: ReturnKind::Fixed(DatumKind::Real),
    };

    impl Generator for Draw {
        fn info(&self) -> &'static GeneratorInfo {
            &DRAW
        }

        fn validate(&self, args: &Args<'_>) -> Result<(), GenerateError> {
            match args.peek("scale").and_then(Datum::as_real) {
                Some(s) if s <= 0.0 => Err(GenerateError::invalid("scale", "must be > 0")),
                _ => Ok(()),
            }
        }

        fn generate(&self, args: &Args<'_>, rng: &mut ModelRng) -> Result<Datum, GenerateError> {
            Ok(Datum::Real(args.real("scale")? * rng.random::<f64>()))
        }
    }

    struct Add;

    static ADD: GeneratorInfo = GeneratorInfo {
        name: "add",
        kind: GeneratorKind::Function,
        description: "x + y",
        params: &[
            ParamInfo::required("x", ParamKind::Number, "x"),
            ParamInfo::required("y", ParamKind::Number, "y"),
        ],
        returns: ReturnKind::Fixed(DatumKind::Real),
    };

    impl Generator for Add {
        fn info(&self) -> &'static GeneratorInfo {
            &ADD
        }

        fn generate(&self, args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
            Ok(Datum::Real(args.real("x")? + args.real("y")?))
        }
    }

    struct Counter(Arc<AtomicUsize>);

    impl ValueListener for Counter {
        fn value_set(&mut self, _id: ValueId, _datum: &Datum) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn rng() -> ModelRng {
        ModelRng::seed_from_u64(7)
    }

    #[test]
    fn unknown_parameter_rejected() {
        let mut m = Model::new();
        let c = m.constant("c", 1.0);
        let err = m.generator(Draw, &[("rate", c)]).unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownParameter {
                generator: "Draw".into(),
                name: "rate".into()
            }
        );
    }

    #[test]
    fn missing_and_invalid_parameters_fail_at_construction() {
        let mut m = Model::new();
        let c = m.constant("c", 1.0);
        assert!(matches!(
            m.generator(Add, &[("x", c)]),
            Err(ModelError::MissingParameter { .. })
        ));
        let neg = m.constant("neg", -1.0);
        assert!(matches!(
            m.generator(Draw, &[("scale", neg)]),
            Err(ModelError::Generator { .. })
        ));
    }

    #[test]
    fn wrong_kind_rejected() {
        let mut m = Model::new();
        let s = m.constant("s", "text");
        let g = m.add_generator(Draw);
        assert!(matches!(
            m.set_input(g, "scale", s),
            Err(ModelError::ParameterKind { .. })
        ));
    }

    #[test]
    fn sampling_forces_upstream_once() {
        let mut m = Model::new();
        let scale = m.constant("scale", 2.0);
        let d = m.generator(Draw, &[("scale", scale)]).unwrap();
        let x = m.random_variable(d, Some("x")).unwrap();
        let f = m.generator(Add, &[("x", x.id()), ("y", x.id())]).unwrap();
        let y = m.derive(f, Some("y")).unwrap();

        let mut rng = rng();
        let y_val = m.sample(y, &mut rng).unwrap().as_real().unwrap();
        let x_val = m.value(x.id()).unwrap().as_real().unwrap();
        assert_eq!(y_val, 2.0 * x_val);

        // Memoized: sampling again does not redraw.
        let again = m.sample(x, &mut rng).unwrap().as_real().unwrap();
        assert_eq!(again, x_val);

        m.reset();
        assert!(!m.is_materialized(x.id()).unwrap());
        assert!(m.is_materialized(scale).unwrap());
    }

    #[test]
    fn outputs_track_rebinding() {
        let mut m = Model::new();
        let a = m.constant("a", 1.0);
        let b = m.constant("b", 2.0);
        let g = m.add_generator(Draw);
        m.set_input(g, "scale", a).unwrap();
        assert_eq!(m.outputs(a).unwrap(), &[g]);
        m.set_input(g, "scale", b).unwrap();
        assert!(m.outputs(a).unwrap().is_empty());
        assert_eq!(m.outputs(b).unwrap(), &[g]);
    }

    #[test]
    fn params_follow_declaration_order() {
        let mut m = Model::new();
        let a = m.constant("a", 1.0);
        let b = m.constant("b", 2.0);
        let g = m.generator(Add, &[("y", b), ("x", a)]).unwrap();
        let names: Vec<_> = m.params(g).unwrap().keys().copied().collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(m.param_value(g, "y").unwrap(), Some(b));
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let mut m = Model::new();
        let a = m.constant("a", 1.0);
        let g = m.generator(Add, &[("x", a), ("y", a)]).unwrap();
        let out = m.derive(g, Some("out")).unwrap();
        assert_eq!(
            m.set_input(g, "x", out),
            Err(ModelError::Cycle { value: out })
        );
    }

    #[test]
    fn derive_once_and_function_is_not_random_variable() {
        let mut m = Model::new();
        let a = m.constant("a", 1.0);
        let g = m.generator(Add, &[("x", a), ("y", a)]).unwrap();
        assert!(matches!(
            m.random_variable(g, Some("r")),
            Err(ModelError::NotADistribution { .. })
        ));
        let out = m.derive(g, None).unwrap();
        assert_eq!(
            m.derive(g, None),
            Err(ModelError::AlreadyDerived {
                generator: "add".into(),
                value: out
            })
        );
    }

    #[test]
    fn randomness_propagates_through_functions() {
        let mut m = Model::new();
        let one = m.constant("one", 1.0);
        let d = m.generator(Draw, &[("scale", one)]).unwrap();
        let x = m.random_variable(d, Some("x")).unwrap();
        let f = m.generator(Add, &[("x", x.id()), ("y", one)]).unwrap();
        let y = m.derive(f, Some("y")).unwrap();
        let g = m.generator(Add, &[("x", one), ("y", one)]).unwrap();
        let z = m.derive(g, Some("z")).unwrap();

        assert!(m.is_random(y).unwrap());
        assert!(!m.is_random_variable(y).unwrap());
        assert!(m.has_random_parameters(f).unwrap());
        assert!(!m.is_random(z).unwrap());
        assert!(!m.is_random(one).unwrap());

        m.sample(y, &mut rng()).unwrap();
        m.sample(z, &mut rng()).unwrap();
        let logged: Vec<_> = m
            .loggable_values()
            .unwrap()
            .into_iter()
            .map(|l| (l.name, l.random_variable))
            .collect();
        assert_eq!(logged, vec![("x", true), ("y", false)]);
    }

    #[test]
    fn set_value_checks_kind_and_notifies() {
        let mut m = Model::new();
        let one = m.constant("one", 1.0);
        let d = m.generator(Draw, &[("scale", one)]).unwrap();
        let x = m.random_variable(d, Some("x")).unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        m.add_listener(x.id(), Box::new(Counter(count.clone())))
            .unwrap();

        assert!(matches!(
            m.set_value(x.id(), true),
            Err(ModelError::TypeMismatch { .. })
        ));
        m.set_value(x.id(), 0.25).unwrap();
        // Clamped: sampling keeps the observed value.
        assert_eq!(m.sample(x, &mut rng()).unwrap(), &Datum::Real(0.25));
        m.reset();
        m.sample(x, &mut rng()).unwrap();
        assert_eq!(count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn density_errors() {
        let mut m = Model::new();
        let one = m.constant("one", 1.0);
        assert_eq!(
            m.log_density(one),
            Err(ModelError::NoProvenance { value: one })
        );
        let d = m.generator(Draw, &[("scale", one)]).unwrap();
        let x = m.random_variable(d, Some("x")).unwrap();
        assert_eq!(
            m.log_density(x),
            Err(ModelError::NotMaterialized { value: x.id() })
        );
        m.sample(x, &mut rng()).unwrap();
        assert_eq!(
            m.log_density(x),
            Err(ModelError::Generator {
                name: "Draw".into(),
                reason: GenerateError::Unsupported {
                    operation: "log_density"
                },
            })
        );
    }
}
