//! Entry-point adapter: typed access to the inputs and outputs of one native call.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use log::{debug, error};
use runmat_mx_api::{Host, MxError, MxResult};
use thiserror::Error;

use crate::args::split_options;
use crate::config;
use crate::mapping::FieldMap;
use crate::protocol::{FromArray, IntoArray};
use crate::sequence::Sequence;

/// Identifier reported when native code panics.
pub const INTERNAL_ERROR_ID: &str = "RunMat:mx:internal";

/// The single error an entry point reports back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entry}: {message}")]
pub struct EntryError {
    pub identifier: String,
    pub message: String,
    pub entry: String,
}

impl EntryError {
    pub fn from_mx(entry: &str, err: &MxError) -> Self {
        Self {
            identifier: err.identifier().to_string(),
            message: err.to_string(),
            entry: entry.to_string(),
        }
    }

    fn from_panic(entry: &str, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "native code panicked".to_string()
        };
        Self {
            identifier: INTERNAL_ERROR_ID.to_string(),
            message,
            entry: entry.to_string(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn format_diagnostic(&self) -> String {
        [
            format!("error: {}", self.message),
            format!("id: {}", self.identifier),
            format!("entry: {}", self.entry),
        ]
        .join("\n")
    }
}

/// One call of a native entry point.
pub struct Invocation<'a, H: Host> {
    host: &'a H,
    name: &'a str,
    nlhs: usize,
    inputs: Sequence<&'a H::Array>,
    outputs: Sequence<H::Array>,
}

impl<'a, H: Host> Invocation<'a, H> {
    pub fn new(host: &'a H, name: &'a str, nlhs: usize, prhs: &[Option<&'a H::Array>]) -> Self {
        Self {
            host,
            name,
            nlhs,
            inputs: Sequence::from_args(prhs),
            outputs: Sequence::with_len(nlhs.max(1)),
        }
    }

    pub fn host(&self) -> &'a H {
        self.host
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn nargin(&self) -> usize {
        self.inputs.len()
    }

    /// Outputs the caller asked for.
    pub fn nargout(&self) -> usize {
        self.nlhs
    }

    pub fn inputs(&self) -> &Sequence<&'a H::Array> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Sequence<H::Array> {
        &self.outputs
    }

    pub fn outputs_mut(&mut self) -> &mut Sequence<H::Array> {
        &mut self.outputs
    }

    /// Required input `index`.
    pub fn arg<T: FromArray<'a, H::Array>>(&self, index: usize) -> MxResult<T> {
        match self.inputs.handle(index) {
            Some(array) => T::from_array(array),
            None => Err(MxError::null_input(format!("argument {}", index + 1))),
        }
    }

    /// Optional input `index`; absent or missing inputs yield `default`.
    pub fn arg_or<T: FromArray<'a, H::Array>>(&self, index: usize, default: T) -> MxResult<T> {
        match self.inputs.handle(index) {
            Some(array) => T::from_array(array),
            None => Ok(default),
        }
    }

    /// Inputs after the first `n_positional`, read as name/value pairs.
    pub fn options(&self, n_positional: usize) -> MxResult<FieldMap<&'a H::Array>> {
        let slots: Vec<_> = self.inputs.iter().map(|slot| slot.copied()).collect();
        let (_, options) = split_options(&slots, n_positional)?;
        Ok(options)
    }

    /// Convert `value` into a new host array and store it as output `index`.
    pub fn set_output<V: IntoArray<H>>(&mut self, index: usize, value: V) -> MxResult<()> {
        let array = value.into_array(self.host)?;
        self.outputs.assign(index, array)?;
        Ok(())
    }

    pub fn set_output_array(&mut self, index: usize, array: H::Array) -> MxResult<()> {
        self.outputs.assign(index, array)?;
        Ok(())
    }

    fn finish(self) -> MxResult<Vec<Option<H::Array>>> {
        if let Some(missing) = (0..self.nlhs).find(|&i| !self.outputs.is_set(i)) {
            return Err(MxError::assignment(
                format!("output {}", missing + 1),
                "requested output was not assigned",
            ));
        }
        Ok(self.outputs.into_slots())
    }
}

/// Run `body` as entry point `name`.
///
/// The outputs hold `max(nlhs, 1)` slots; every one of the first `nlhs` must be assigned.
/// Any failure, including a panic when `entry.catch_panics` is set, becomes one [`EntryError`].
pub fn invoke<'a, H, F>(
    host: &'a H,
    name: &'a str,
    nlhs: usize,
    prhs: &[Option<&'a H::Array>],
    body: F,
) -> Result<Vec<Option<H::Array>>, EntryError>
where
    H: Host,
    F: FnOnce(&mut Invocation<'a, H>) -> MxResult<()>,
{
    let catch_panics = config::current().entry.catch_panics;
    runmat_mx_logging::with_entry_span(name, || {
        let mut invocation = Invocation::new(host, name, nlhs, prhs);
        debug!("{name}: {} input(s), {nlhs} output(s)", prhs.len());
        if catch_panics {
            match catch_unwind(AssertUnwindSafe(|| body(&mut invocation))) {
                Ok(result) => result.map_err(|err| EntryError::from_mx(name, &err))?,
                Err(payload) => {
                    let err = EntryError::from_panic(name, payload);
                    error!("{name} panicked: {}", err.message);
                    return Err(err);
                }
            }
        } else {
            body(&mut invocation).map_err(|err| EntryError::from_mx(name, &err))?;
        }
        let outputs = invocation
            .finish()
            .map_err(|err| EntryError::from_mx(name, &err))?;
        tracing::debug!(entry = name, outputs = outputs.len(), "entry point finished");
        Ok(outputs)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use runmat_mx_host::{InProcessHost, MxArray};

    #[test]
    fn missing_outputs_are_reported() {
        let host = InProcessHost::new();
        let err = invoke(&host, "twoout", 2, &[], |call| call.set_output(0, 1.0f64)).unwrap_err();
        assert_eq!(err.identifier(), "RunMat:mx:assignment");
        assert!(err.message().contains("output 2"));
    }

    #[test]
    fn zero_outputs_still_allow_ans() {
        let host = InProcessHost::new();
        let outputs = invoke(&host, "noout", 0, &[], |_| Ok(())).unwrap();
        assert_eq!(outputs.len(), 1);
        assert!(outputs[0].is_none());
    }

    #[test]
    fn required_argument_names_its_position() {
        let host = InProcessHost::new();
        let x = MxArray::scalar(2.0);
        let err = invoke(&host, "needs2", 1, &[Some(&x)], |call| {
            let _: f64 = call.arg(1)?;
            Ok(())
        })
        .unwrap_err();
        assert_eq!(err.identifier(), "RunMat:mx:nullInput");
        assert!(err.message().contains("argument 2"));
    }

    #[test]
    fn diagnostic_lists_identifier_and_entry() {
        let err = EntryError::from_mx("f", &MxError::null_input("x"));
        assert_eq!(
            err.format_diagnostic(),
            "error: x: expected a value but got none\nid: RunMat:mx:nullInput\nentry: f"
        );
    }
}
