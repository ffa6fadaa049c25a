//! Decides which generated members a routine gets
use super::{
	sql_tree::*,
	type_map::{BindingType, TypeMapping},
};

/// A pre-call array binder: the parameter at `position` is wrapped in an `arrayvar` of `element`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayBinder {
	pub name: String,
	pub position: u32,
	pub element: BindingType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchBody {
	Vectorized(Vec<ArrayBinder>),
	/// Out and in/out arrays cannot be bound per row
	OutputArrays,
}

/// One generated member; a routine yields one or two of these
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutinePlan {
	ScalarFunction {
		return_type: BindingType,
		binders: Vec<ArrayBinder>,
	},
	/// Function whose return (or array element) type has no binding; the member always raises
	UnsupportedFunction { catalog_type: String },
	Procedure { binders: Vec<ArrayBinder> },
	/// The `_V` member
	BatchProcedure { body: BatchBody },
	/// Procedure with an array parameter whose element type has no binding; the member always raises
	UnsupportedProcedure { catalog_type: String, vectorized: bool },
}

impl RoutinePlan {
	pub fn label(&self) -> &'static str {
		match self {
			RoutinePlan::ScalarFunction { .. } => "function",
			RoutinePlan::UnsupportedFunction { .. } => "unsupported function",
			RoutinePlan::Procedure { .. } => "procedure",
			RoutinePlan::BatchProcedure { .. } => "batch procedure",
			RoutinePlan::UnsupportedProcedure { .. } => "unsupported procedure",
		}
	}

	/// Whether invoking the generated member can only fail
	pub fn is_stub(&self) -> bool {
		matches!(
			self,
			RoutinePlan::UnsupportedFunction { .. }
				| RoutinePlan::UnsupportedProcedure { .. }
				| RoutinePlan::BatchProcedure {
					body: BatchBody::OutputArrays
				}
		)
	}
}

/// Binders for every array parameter, or the first element type without a binding
fn array_binders(routine: &RoutineDescriptor, mapping: &TypeMapping) -> Result<Vec<ArrayBinder>, String> {
	routine
		.array_parameters()
		.map(|p| {
			let element_type = p.element_type.as_deref().unwrap_or_default();
			mapping
				.map(element_type)
				.map(|element| ArrayBinder {
					name: p.name.clone(),
					position: p.position,
					element,
				})
				.ok_or_else(|| element_type.to_owned())
		})
		.collect()
}

pub fn classify(routine: &RoutineDescriptor, mapping: &TypeMapping) -> Vec<RoutinePlan> {
	let binders = array_binders(routine, mapping);
	match routine.kind {
		RoutineKind::Function => {
			let catalog_type = routine.return_type.clone().unwrap_or_default();
			let plan = match (mapping.map(&catalog_type), binders) {
				(Some(return_type), Ok(binders)) => RoutinePlan::ScalarFunction { return_type, binders },
				(None, _) => RoutinePlan::UnsupportedFunction { catalog_type },
				(Some(_), Err(catalog_type)) => RoutinePlan::UnsupportedFunction { catalog_type },
			};
			vec![plan]
		},
		RoutineKind::Procedure => match binders {
			Ok(binders) => {
				let body = if routine.has_output_array_param {
					BatchBody::OutputArrays
				} else {
					BatchBody::Vectorized(binders.clone())
				};
				vec![RoutinePlan::Procedure { binders }, RoutinePlan::BatchProcedure { body }]
			},
			Err(catalog_type) => vec![
				RoutinePlan::UnsupportedProcedure {
					catalog_type: catalog_type.clone(),
					vectorized: false,
				},
				RoutinePlan::UnsupportedProcedure {
					catalog_type,
					vectorized: true,
				},
			],
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn param(name: &str, position: u32, catalog_type: &str, element: Option<&str>, direction: ParameterDirection) -> ParameterDescriptor {
		ParameterDescriptor {
			name: name.into(),
			position,
			catalog_type: catalog_type.into(),
			direction,
			element_type: element.map(Into::into),
		}
	}

	fn routine(kind: RoutineKind, return_type: Option<&str>, parameters: Vec<ParameterDescriptor>) -> RoutineDescriptor {
		let has_output_array_param = parameters
			.iter()
			.any(|p| p.is_array_type() && p.direction.is_output());
		RoutineDescriptor {
			name: "R".into(),
			kind,
			parameters,
			has_output_array_param,
			return_type: return_type.map(Into::into),
		}
	}

	#[test]
	fn mapped_function_is_scalar() {
		let r = routine(RoutineKind::Function, Some("CURSOR"), vec![]);
		assert_eq!(classify(&r, &TypeMapping::oracle()), vec![RoutinePlan::ScalarFunction {
			return_type: BindingType::Cursor,
			binders: vec![],
		}]);
	}

	#[test]
	fn unmapped_return_type_is_a_stub() {
		let r = routine(RoutineKind::Function, Some("OBJECT"), vec![param("a", 1, "NUMBER", None, ParameterDirection::In)]);
		let plans = classify(&r, &TypeMapping::oracle());
		assert_eq!(plans, vec![RoutinePlan::UnsupportedFunction { catalog_type: "OBJECT".into() }]);
		assert!(plans[0].is_stub());
	}

	#[test]
	fn procedures_get_a_batch_form() {
		let r = routine(RoutineKind::Procedure, None, vec![
			param("id", 1, "NUMBER", None, ParameterDirection::In),
			param("tbl", 2, "PL/SQL TABLE", Some("VARCHAR2"), ParameterDirection::In),
		]);
		let binder = ArrayBinder { name: "tbl".into(), position: 2, element: BindingType::String };
		assert_eq!(classify(&r, &TypeMapping::oracle()), vec![
			RoutinePlan::Procedure { binders: vec![binder.clone()] },
			RoutinePlan::BatchProcedure { body: BatchBody::Vectorized(vec![binder]) },
		]);
	}

	#[test]
	fn output_arrays_still_emit_a_failing_batch_form() {
		let r = routine(RoutineKind::Procedure, None, vec![
			param("tbl", 1, "PL/SQL TABLE", Some("NUMBER"), ParameterDirection::InOut),
		]);
		let plans = classify(&r, &TypeMapping::oracle());
		assert_eq!(plans.len(), 2);
		assert_eq!(plans[1], RoutinePlan::BatchProcedure { body: BatchBody::OutputArrays });
		assert!(!plans[0].is_stub());
		assert!(plans[1].is_stub());
	}

	#[test]
	fn unmapped_array_elements_make_stubs() {
		let tbl = param("tbl", 1, "PL/SQL TABLE", Some("PL/SQL RECORD"), ParameterDirection::In);
		let p = routine(RoutineKind::Procedure, None, vec![tbl.clone()]);
		let plans = classify(&p, &TypeMapping::oracle());
		assert!(plans.iter().all(RoutinePlan::is_stub));
		assert_eq!(plans.len(), 2);

		let f = routine(RoutineKind::Function, Some("NUMBER"), vec![tbl]);
		assert_eq!(classify(&f, &TypeMapping::oracle()), vec![RoutinePlan::UnsupportedFunction {
			catalog_type: "PL/SQL RECORD".into(),
		}]);
	}
}
