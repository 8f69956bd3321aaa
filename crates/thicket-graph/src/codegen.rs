//! Model source text.
//!
//! Statements take one of three forms:
//!
//! ```text
//! theta = 20.0;                          // named constant
//! L = treeLength(tree=tree);             // function
//! tree ~ Coalescent(theta=theta, n=5);   // distribution
//! ```
//!
//! Arguments are `name=arg` in declaration order; unbound optional
//! parameters are left out. A named value appears by name, an anonymous
//! one inline as a literal or nested call.

use thicket_core::{GeneratorId, ModelError, ValueId};

use crate::model::Model;
use crate::traverse::{walk, Order, Visitor};

impl Model {
    /// Source text for a value.
    ///
    /// A named value yields its defining statement; an anonymous one
    /// yields the inline expression that would stand in for it.
    pub fn code_string(&self, value: ValueId) -> Result<String, ModelError> {
        let slot = self.value_slot(value)?;
        let Some(name) = slot.name.as_deref() else {
            return self.expression(value);
        };
        match slot.provenance {
            Some(g) => {
                let op = self.info(g)?.kind.code_char();
                Ok(format!("{name} {op} {};", self.generator_code_string(g)?))
            }
            None => Ok(format!("{name} = {};", self.expression(value)?)),
        }
    }

    /// Call expression for a generator, e.g. `Exp(rate=r)`.
    pub fn generator_code_string(&self, generator: GeneratorId) -> Result<String, ModelError> {
        let info = self.info(generator)?;
        let mut args = Vec::new();
        for (name, &value) in self.params(generator)? {
            args.push(format!("{name}={}", self.argument(value)?));
        }
        Ok(format!("{}({})", info.name, args.join(", ")))
    }

    /// Every statement needed to define `root`, dependencies first, one
    /// per line.
    pub fn program(&self, root: ValueId) -> Result<String, ModelError> {
        let mut lines = Statements::default();
        walk(self, root, Order::Post, &mut lines)?;
        Ok(lines.0.join("\n"))
    }

    fn argument(&self, value: ValueId) -> Result<String, ModelError> {
        match self.value_slot(value)?.name.as_deref() {
            Some(name) => Ok(name.to_string()),
            None => self.expression(value),
        }
    }

    fn expression(&self, value: ValueId) -> Result<String, ModelError> {
        let slot = self.value_slot(value)?;
        if let Some(g) = slot.provenance {
            return self.generator_code_string(g);
        }
        let datum = slot
            .datum
            .as_ref()
            .ok_or(ModelError::NotMaterialized { value })?;
        datum.literal().ok_or(ModelError::Unrepresentable {
            value,
            kind: slot.kind,
        })
    }
}

#[derive(Default)]
struct Statements(Vec<String>);

impl Visitor for Statements {
    fn visit_value(&mut self, model: &Model, id: ValueId) -> Result<(), ModelError> {
        if model.name(id)?.is_some() {
            self.0.push(model.code_string(id)?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::generator::{Args, Generator, ModelRng};
    use crate::model::Model;
    use thicket_core::{
        Alignment, Datum, DatumKind, GenerateError, GeneratorInfo, GeneratorKind, ModelError,
        ParamInfo, ParamKind, ReturnKind,
    };

    struct Scale;

    static SCALE: GeneratorInfo = GeneratorInfo {
        name: "Scale",
        kind: GeneratorKind::Distribution,
        description: "test distribution",
        params: &[
            ParamInfo::required("x", ParamKind::Number, "x"),
            ParamInfo::optional("by", ParamKind::Number, "factor"),
            ParamInfo::optional("tag", ParamKind::Is(DatumKind::Text), "label"),
        ],
        returns: ReturnKind::Fixed(DatumKind::Real),
    };

    impl Generator for Scale {
        fn info(&self) -> &'static GeneratorInfo {
            &SCALE
        }

        fn generate(&self, args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
            Ok(Datum::Real(
                args.real("x")? * args.opt_real("by")?.unwrap_or(1.0),
            ))
        }
    }

    struct Neg;

    static NEG: GeneratorInfo = GeneratorInfo {
        name: "neg",
        kind: GeneratorKind::Function,
        description: "negation",
        params: &[ParamInfo::required("x", ParamKind::Number, "x")],
        returns: ReturnKind::Fixed(DatumKind::Real),
    };

    impl Generator for Neg {
        fn info(&self) -> &'static GeneratorInfo {
            &NEG
        }

        fn generate(&self, args: &Args<'_>, _rng: &mut ModelRng) -> Result<Datum, GenerateError> {
            Ok(Datum::Real(-args.real("x")?))
        }
    }

    #[test]
    fn statements_for_each_form() {
        let mut m = Model::new();
        let theta = m.constant("theta", 20.0);
        let g = m.generator(Scale, &[("x", theta)]).unwrap();
        let y = m.random_variable(g, Some("y")).unwrap();
        let f = m.generator(Neg, &[("x", y.id())]).unwrap();
        let z = m.derive(f, Some("z")).unwrap();

        assert_eq!(m.code_string(theta).unwrap(), "theta = 20.0;");
        assert_eq!(m.code_string(y.id()).unwrap(), "y ~ Scale(x=theta);");
        assert_eq!(m.code_string(z).unwrap(), "z = neg(x=y);");
        assert_eq!(
            m.program(z).unwrap(),
            "theta = 20.0;\ny ~ Scale(x=theta);\nz = neg(x=y);"
        );
    }

    #[test]
    fn anonymous_values_are_inlined_in_declaration_order() {
        let mut m = Model::new();
        let g = m.add_generator(Scale);
        m.set_param(g, "by", 2i64).unwrap();
        let inner = m.add_generator(Neg);
        m.set_param(inner, "x", 1.5).unwrap();
        let nested = m.derive(inner, None).unwrap();
        m.set_input(g, "x", nested).unwrap();
        let y = m.random_variable(g, Some("y")).unwrap();

        assert_eq!(m.code_string(nested).unwrap(), "neg(x=1.5)");
        assert_eq!(m.program(y.id()).unwrap(), "y ~ Scale(x=neg(x=1.5), by=2);");
    }

    #[test]
    fn alignment_has_no_literal() {
        let mut m = Model::new();
        let aln = m.anonymous(Alignment::new(vec!["a".into()], 1, 0));
        assert_eq!(
            m.code_string(aln),
            Err(ModelError::Unrepresentable {
                value: aln,
                kind: DatumKind::Alignment
            })
        );
    }
}
