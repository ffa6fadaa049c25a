//! Select statements into the Oracle data dictionary and corresponding return types
//!
//! Every statement reads the `ALL_*` views and scopes by `owner = NVL(:owner, USER)`, so binding `:owner` to NULL restricts a query to the session schema
use orapig_core::*;

/// Pairs a `PL/SQL TABLE` argument row `a` with its element row `e` (same position, one data level down)
///
/// Shared by [`GET_PARAMETERS`] and [`COUNT_OUTPUT_ARRAYS`] so both agree on which positions are arrays
///
/// [`GET_PARAMETERS`]: ./constant.GET_PARAMETERS.html
/// [`COUNT_OUTPUT_ARRAYS`]: ./constant.COUNT_OUTPUT_ARRAYS.html
macro_rules! array_pair_join {
	() => {
"LEFT JOIN all_arguments e
	ON e.owner = a.owner
	AND e.package_name = a.package_name
	AND e.object_name = a.object_name
	AND NVL(e.overload, '1') = NVL(a.overload, '1')
	AND e.position = a.position
	AND e.data_level = a.data_level + 1
	AND a.data_type = 'PL/SQL TABLE'
	AND e.data_type != 'PL/SQL TABLE'
"
	};
}

/// Top level, named arguments of the first overload of one routine
macro_rules! routine_arguments {
	() => {
"WHERE a.owner = NVL(:owner, USER)
	AND a.package_name = :package_name
	AND a.object_name = :object_name
	AND NVL(a.overload, '1') = '1'
	AND a.data_level = 0
	AND a.argument_name IS NOT NULL
"
	};
}

pub const GET_SESSION_USER: &str = "SELECT USER FROM DUAL";

/// Looks a name up as a package of the target schema, then a private synonym, then a public synonym
pub const RESOLVE_PACKAGE: &str = "SELECT owner, object_name, db_link, precedence
FROM (
	SELECT o.owner, o.object_name, CAST(NULL AS VARCHAR2(128)) AS db_link, 1 AS precedence
	FROM all_objects o
	WHERE o.object_name = :name
		AND o.owner = NVL(:schema, USER)
		AND o.object_type = 'PACKAGE'
	UNION ALL
	SELECT s.table_owner, s.table_name, s.db_link, 2
	FROM all_synonyms s
	WHERE s.synonym_name = :name
		AND s.owner = NVL(:schema, USER)
	UNION ALL
	SELECT s.table_owner, s.table_name, s.db_link, 3
	FROM all_synonyms s
	WHERE s.synonym_name = :name
		AND s.owner = 'PUBLIC'
		AND :schema IS NULL
)
ORDER BY precedence";
#[derive(Debug, TryFromRow)]
pub struct GetResolvedName {
	pub owner: String,
	pub name: String,
	pub db_link: Option<String>,
	pub precedence: i64,
}

pub const COUNT_PACKAGES: &str = "SELECT COUNT(*)
FROM all_objects
WHERE object_name = :package_name
	AND owner = NVL(:owner, USER)
	AND object_type = 'PACKAGE'";

pub const GET_ROUTINE_NAMES: &str = "SELECT DISTINCT ap.procedure_name
FROM all_procedures ap
JOIN all_objects ao
	ON ao.object_name = ap.object_name
	AND ao.owner = ap.owner
WHERE ao.object_type = 'PACKAGE'
	AND ap.object_name = :package_name
	AND ap.procedure_name IS NOT NULL
	AND ap.owner = NVL(:owner, USER)
ORDER BY ap.procedure_name";
#[derive(Debug, TryFromRow)]
pub struct GetRoutineNames {
	pub name: String,
}

/// A function has a nameless, typed argument at position 0 (its return value)
pub const COUNT_RETURN_VALUES: &str = "SELECT COUNT(data_type)
FROM all_arguments
WHERE owner = NVL(:owner, USER)
	AND package_name = :package_name
	AND object_name = :object_name
	AND NVL(overload, '1') = '1'
	AND data_level = 0
	AND data_type IS NOT NULL
	AND position = 0
	AND argument_name IS NULL";

pub const GET_RETURN_TYPE: &str = "SELECT data_type
FROM all_arguments
WHERE owner = NVL(:owner, USER)
	AND package_name = :package_name
	AND object_name = :object_name
	AND NVL(overload, '1') = '1'
	AND data_level = 0
	AND position = 0
	AND argument_name IS NULL";

pub const GET_PARAMETERS: &str = concat!(
"SELECT a.argument_name,
	a.position,
	a.data_type,
	a.in_out,
	e.data_type
FROM all_arguments a
",
	array_pair_join!(),
	routine_arguments!(),
"ORDER BY a.position"
);
#[derive(Debug, TryFromRow)]
pub struct GetParameters {
	pub name: String,
	pub position: u32,
	pub data_type: String,
	pub in_out: String,
	pub element_type: Option<String>,
}

pub const COUNT_OUTPUT_ARRAYS: &str = concat!(
"SELECT COUNT(a.argument_name)
FROM all_arguments a
",
	array_pair_join!(),
	routine_arguments!(),
"	AND e.data_type IS NOT NULL
	AND a.in_out IN ('OUT', 'IN/OUT')"
);

pub const GET_PACKAGE_SOURCE: &str = "SELECT text
FROM all_source
WHERE name = :package_name
	AND type = 'PACKAGE'
	AND owner = NVL(:owner, USER)
ORDER BY line";
#[derive(Debug, TryFromRow)]
pub struct GetSourceLine {
	pub text: Option<String>,
}
