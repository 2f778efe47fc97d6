use log::{debug, info};

use crate::arith::{Arithmetic, Reduce};
use crate::environment::Environment;
use crate::error::{CalcError, Result};
use crate::line::{Line, LineKind};
use crate::value::Value;

/// Evaluates parsed [`Line`]s against one borrowed [`Environment`].
///
/// Constructed once per environment and reused across lines.  Lines are
/// evaluated strictly in the order they are handed in; there is no dependency
/// tracking between them.
pub struct Evaluator<'env, R: Reduce = Arithmetic> {
    env: &'env mut Environment,
    reducer: R,
}

impl<'env> Evaluator<'env> {
    pub fn new(env: &'env mut Environment) -> Self {
        Self::with_reducer(env, Arithmetic)
    }
}

impl<'env, R: Reduce> Evaluator<'env, R> {
    /// Evaluator that hands arithmetic to `reducer` instead of [`Arithmetic`].
    pub fn with_reducer(env: &'env mut Environment, reducer: R) -> Self {
        info!("Initializing Evaluator");

        Self { env, reducer }
    }

    pub fn environment(&self) -> &Environment {
        &*self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut *self.env
    }

    /// Parse `raw` and evaluate it.
    pub fn evaluate_str(&mut self, raw: &str) -> Result<Value> {
        let mut line = Line::parse(raw)?;
        self.evaluate(&mut line)
    }

    /// Evaluate one statement, applying its side effect on the environment.
    ///
    /// Any failure leaves the environment exactly as it was.
    pub fn evaluate(&mut self, line: &mut Line) -> Result<Value> {
        debug!("Evaluating {:?} line: {}", line.kind(), line);

        let value = match line.kind() {
            LineKind::Plain => self.reduce(line)?,

            LineKind::ScalarAssign => {
                let value = self.reduce(line)?;
                let target = target_of(line)?;

                self.env.register_variable(target, &value.to_string())?;

                info!("Assigned {} to '{}'", value, target);

                value
            }

            LineKind::ArrayAssign => {
                let target = target_of(line)?;

                self.env.register_variable(target, &line.eval_line()?)?;

                info!("Declared array '{}'", target);

                Value::Nop
            }

            LineKind::FuncCall => {
                let target = target_of(line)?;

                if !self.env.has_function(target) {
                    return Err(CalcError::not_found(target));
                }

                let args = self.env.get_operand(&line.eval_line()?)?;

                Value::Text(self.env.call_function(target, &args)?)
            }
        };

        debug!("Line evaluated to: {}", value);

        Ok(value)
    }

    fn reduce(&self, line: &mut Line) -> Result<Value> {
        let expr = line.eval_line_with(&*self.env)?;

        Ok(Value::Number(self.reducer.reduce(&expr)?))
    }
}

fn target_of(line: &Line) -> Result<&str> {
    line.target()
        .ok_or_else(|| CalcError::invalid_name(line.to_string()))
}
