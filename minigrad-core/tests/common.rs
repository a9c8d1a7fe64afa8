// Each test binary only uses part of the operator set.
#![allow(dead_code)]

use minigrad_core::{AutogradError, Context, Function, GradNumeric, Value};
use std::sync::Arc;

// A small operator set built on the public `Function` interface.

#[derive(Debug)]
pub struct Add;

impl<T: GradNumeric> Function<T> for Add {
    fn name(&self) -> &'static str {
        "add"
    }

    fn forward(&self, _ctx: &mut Context<T>, inputs: &[T]) -> Result<T, AutogradError> {
        Ok(inputs[0] + inputs[1])
    }

    fn backward(&self, _ctx: &Context<T>, d_output: T) -> Result<Vec<T>, AutogradError> {
        Ok(vec![d_output, d_output])
    }
}

#[derive(Debug)]
pub struct Mul;

impl<T: GradNumeric> Function<T> for Mul {
    fn name(&self) -> &'static str {
        "mul"
    }

    fn forward(&self, ctx: &mut Context<T>, inputs: &[T]) -> Result<T, AutogradError> {
        ctx.save_for_backward([inputs[0], inputs[1]]);
        Ok(inputs[0] * inputs[1])
    }

    fn backward(&self, ctx: &Context<T>, d_output: T) -> Result<Vec<T>, AutogradError> {
        match ctx.saved_tensors() {
            [a, b] => Ok(vec![d_output * *b, d_output * *a]),
            other => Err(AutogradError::BackwardError(format!(
                "mul expects 2 saved values, found {}",
                other.len()
            ))),
        }
    }
}

#[derive(Debug)]
pub struct Exp;

impl<T: GradNumeric> Function<T> for Exp {
    fn name(&self) -> &'static str {
        "exp"
    }

    fn forward(&self, ctx: &mut Context<T>, inputs: &[T]) -> Result<T, AutogradError> {
        let out = inputs[0].exp();
        ctx.save_for_backward([out]);
        Ok(out)
    }

    fn backward(&self, ctx: &Context<T>, d_output: T) -> Result<Vec<T>, AutogradError> {
        Ok(vec![d_output * ctx.saved_tensors()[0]])
    }
}

#[derive(Debug)]
pub struct Sin;

impl<T: GradNumeric> Function<T> for Sin {
    fn name(&self) -> &'static str {
        "sin"
    }

    fn forward(&self, ctx: &mut Context<T>, inputs: &[T]) -> Result<T, AutogradError> {
        ctx.save_for_backward([inputs[0]]);
        Ok(inputs[0].sin())
    }

    fn backward(&self, ctx: &Context<T>, d_output: T) -> Result<Vec<T>, AutogradError> {
        Ok(vec![d_output * ctx.saved_tensors()[0].cos()])
    }
}

/// Multiplication by a fixed factor.
#[derive(Debug)]
pub struct Scale<T>(pub T);

impl<T: GradNumeric> Function<T> for Scale<T> {
    fn name(&self) -> &'static str {
        "scale"
    }

    fn forward(&self, _ctx: &mut Context<T>, inputs: &[T]) -> Result<T, AutogradError> {
        Ok(inputs[0] * self.0)
    }

    fn backward(&self, _ctx: &Context<T>, d_output: T) -> Result<Vec<T>, AutogradError> {
        Ok(vec![d_output * self.0])
    }
}

pub fn add<T: GradNumeric>(a: &Value<T>, b: &Value<T>) -> Result<Value<T>, AutogradError> {
    Value::apply(Arc::new(Add), &[a.clone(), b.clone()])
}

pub fn mul<T: GradNumeric>(a: &Value<T>, b: &Value<T>) -> Result<Value<T>, AutogradError> {
    Value::apply(Arc::new(Mul), &[a.clone(), b.clone()])
}

pub fn exp<T: GradNumeric>(a: &Value<T>) -> Result<Value<T>, AutogradError> {
    Value::apply(Arc::new(Exp), &[a.clone()])
}

pub fn sin<T: GradNumeric>(a: &Value<T>) -> Result<Value<T>, AutogradError> {
    Value::apply(Arc::new(Sin), &[a.clone()])
}

pub fn scale<T: GradNumeric>(a: &Value<T>, factor: T) -> Result<Value<T>, AutogradError> {
    Value::apply(Arc::new(Scale(factor)), &[a.clone()])
}
