//! Catalog queries describing a package and its routines
use super::{
	catalog_select_types::*,
	error::{CompileError, Result},
	sql_tree::*,
};
use orapig_core::*;

/// Which part of the catalog a run may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogScope {
	/// Only packages of the session schema, names are taken literally
	SessionSchema,
	/// Any visible package; names go through synonym resolution
	AllSchemas,
}

impl Default for CatalogScope {
	fn default() -> CatalogScope {
		CatalogScope::SessionSchema
	}
}

pub struct SchemaIntrospector<'a, E: QueryExecutor> {
	executor: &'a mut E,
	scope: CatalogScope,
}

impl<'a, E: QueryExecutor> SchemaIntrospector<'a, E> {
	pub fn new(executor: &'a mut E, scope: CatalogScope) -> SchemaIntrospector<'a, E> {
		SchemaIntrospector { executor, scope }
	}

	pub fn session_user(&mut self) -> Result<String> {
		self.query_one(GET_SESSION_USER, "session user", "USER", &[])
	}

	/// Resolves a requested name to the package it denotes
	///
	/// Fails for database links and names with more than two parts (`schema.package.member`)
	#[tracing::instrument(skip(self))]
	pub fn resolve_identity(&mut self, requested: &str) -> Result<PackageIdentity> {
		let requested = requested.trim().to_uppercase();
		if requested.contains('@') {
			return Err(CompileError::name_resolution(&requested, "packages behind a database link are not supported"));
		}
		let parts: Vec<&str> = requested.split('.').collect();
		let (requested_schema, object) = match parts.as_slice() {
			[object] => (None, *object),
			[schema, object] => (Some((*schema).to_owned()), *object),
			_ => return Err(CompileError::name_resolution(&requested, "name must refer to a package, not one of its members")),
		};
		if object.is_empty() || requested_schema.as_deref() == Some("") {
			return Err(CompileError::name_resolution(&requested, "empty name"));
		}
		let session_user = self.session_user()?;

		let (owner, canonical_name) = match self.scope {
			CatalogScope::SessionSchema => {
				if requested_schema.is_some() {
					return Err(CompileError::name_resolution(
						&requested,
						"schema-qualified names need the all-schemas catalog scope",
					));
				}
				(None, object.to_owned())
			},
			CatalogScope::AllSchemas => {
				let params = [
					("name", Value::from(object)),
					("schema", Value::from(requested_schema.as_deref())),
				];
				let resolved: GetResolvedName = self
					.query_opt(RESOLVE_PACKAGE, &params)?
					.ok_or_else(|| CompileError::name_resolution(&requested, "no package or synonym by that name"))?;
				tracing::debug!(owner = %resolved.owner, name = %resolved.name, precedence = resolved.precedence, "resolved");
				if let Some(link) = resolved.db_link.filter(|l| !l.is_empty()) {
					return Err(CompileError::name_resolution(
						&requested,
						format!("resolves to {}.{}@{}, remote packages are not supported", resolved.owner, resolved.name, link),
					));
				}
				(Some(resolved.owner), resolved.name)
			},
		};

		let is_synonym = canonical_name != object
			|| owner.as_ref().map_or(false, |o| *o != session_user);
		Ok(PackageIdentity {
			owner,
			canonical_name,
			requested_name: object.to_owned(),
			requested_schema,
			session_user,
			is_synonym,
		})
	}

	pub fn package_exists(&mut self, identity: &PackageIdentity) -> Result<bool> {
		let count: i64 = self.query_one(COUNT_PACKAGES, "package count", &identity.canonical_name, &package_params(identity))?;
		Ok(count > 0)
	}

	/// Names of the package's public routines, alphabetically
	pub fn list_routines(&mut self, identity: &PackageIdentity) -> Result<Vec<String>> {
		let rows: Vec<GetRoutineNames> = self.query(GET_ROUTINE_NAMES, &package_params(identity))?;
		Ok(rows.into_iter().map(|r| r.name).collect())
	}

	pub fn is_function(&mut self, identity: &PackageIdentity, routine: &str) -> Result<bool> {
		let count: i64 = self.query_one(COUNT_RETURN_VALUES, "return value count", routine, &routine_params(identity, routine))?;
		Ok(count > 0)
	}

	/// Named arguments in position order, with the element type of `PL/SQL TABLE` arguments
	pub fn list_parameters(&mut self, identity: &PackageIdentity, routine: &str) -> Result<Vec<ParameterDescriptor>> {
		let rows: Vec<GetParameters> = self.query(GET_PARAMETERS, &routine_params(identity, routine))?;
		Ok(rows
			.into_iter()
			.map(|r| ParameterDescriptor {
				name: r.name.to_lowercase(),
				position: r.position,
				catalog_type: r.data_type,
				direction: ParameterDirection::from_catalog(&r.in_out),
				element_type: r.element_type,
			})
			.collect())
	}

	/// Whether any `PL/SQL TABLE` argument is `OUT` or `IN/OUT`
	pub fn has_output_array_parameters(&mut self, identity: &PackageIdentity, routine: &str) -> Result<bool> {
		let count: i64 = self.query_one(COUNT_OUTPUT_ARRAYS, "output array count", routine, &routine_params(identity, routine))?;
		Ok(count > 0)
	}

	pub fn return_type(&mut self, identity: &PackageIdentity, routine: &str) -> Result<String> {
		let data_type: Option<Option<String>> = self.query_opt(GET_RETURN_TYPE, &routine_params(identity, routine))?;
		data_type.flatten().ok_or_else(|| CompileError::MissingReturnType {
			package: identity.qualified_name(),
			routine: routine.to_owned(),
		})
	}

	/// Runs every routine level query for `routine`
	#[tracing::instrument(skip(self, identity), fields(package = %identity.canonical_name))]
	pub fn describe_routine(&mut self, identity: &PackageIdentity, routine: &str) -> Result<RoutineDescriptor> {
		let (kind, return_type) = if self.is_function(identity, routine)? {
			(RoutineKind::Function, Some(self.return_type(identity, routine)?))
		} else {
			(RoutineKind::Procedure, None)
		};
		let parameters = self.list_parameters(identity, routine)?;
		let has_output_array_param = self.has_output_array_parameters(identity, routine)?;
		Ok(RoutineDescriptor {
			name: routine.to_owned(),
			kind,
			parameters,
			has_output_array_param,
			return_type,
		})
	}
}

fn package_params(identity: &PackageIdentity) -> [(&'static str, Value); 2] {
	[
		("owner", Value::from(identity.owner.as_deref())),
		("package_name", Value::from(identity.canonical_name.as_str())),
	]
}

fn routine_params(identity: &PackageIdentity, routine: &str) -> [(&'static str, Value); 3] {
	let [owner, package] = package_params(identity);
	[owner, package, ("object_name", Value::from(routine))]
}

/// Wrappers on SQL select statements
impl<'a, E: QueryExecutor> SchemaIntrospector<'a, E> {
	fn query<T: TryFromRow>(&mut self, sql: &str, params: &[(&str, Value)]) -> Result<Vec<T>> {
		self.executor
			.execute(sql, params)?
			.map(|row| T::from_row(&row))
			.collect::<Result<_, SqlError>>()
			.map_err(Into::into)
	}

	fn query_opt<T: TryFromRow>(&mut self, sql: &str, params: &[(&str, Value)]) -> Result<Option<T>> {
		self.executor
			.execute(sql, params)?
			.fetch_one()
			.as_ref()
			.map(T::from_row)
			.transpose()
			.map_err(Into::into)
	}

	/// Like `query_opt` but a missing row is a [`CompileError::SchemaIntegrity`]
	fn query_one<T: TryFromRow>(
		&mut self,
		sql: &str,
		query: &'static str,
		subject: &str,
		params: &[(&str, Value)],
	) -> Result<T> {
		self.query_opt(sql, params)?.ok_or_else(|| CompileError::SchemaIntegrity {
			query,
			subject: subject.to_owned(),
		})
	}
}
