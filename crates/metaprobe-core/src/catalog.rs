//! Catalog query definitions.
//!
//! Each listing operation is one [`CatalogQuery`] constant: the system view it
//! reads, the columns it filters with `LIKE`, and the columns it sorts by. The
//! SQL template is generated from that data, so every listing goes through the
//! same render-and-execute path.
//!
//! Existence checks use [`ExistenceProbe`]s, which compare names for equality
//! and only ask for `SELECT 1`.

use crate::template::QueryParams;
use std::fmt::Write;

/// `LIKE` pattern that matches every value.
pub const MATCH_ALL: &str = "%";

/// One `<column> LIKE {placeholder}` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogFilter {
    pub column: &'static str,
    pub placeholder: &'static str,
}

const fn filter(column: &'static str, placeholder: &'static str) -> CatalogFilter {
    CatalogFilter {
        column,
        placeholder,
    }
}

/// A listing over one system catalog view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Operation name, used in logs.
    pub name: &'static str,
    /// Fully qualified system view.
    pub view: &'static str,
    /// Filters, in the order patterns are passed to the operation.
    pub filters: &'static [CatalogFilter],
    /// Sort keys, all ascending. Empty means backend order.
    pub order_by: &'static [&'static str],
}

impl CatalogQuery {
    /// The SQL template for this listing.
    pub fn template(&self) -> String {
        let mut sql = format!("SELECT * FROM {}", self.view);
        for (i, filter) in self.filters.iter().enumerate() {
            let keyword = if i == 0 { "WHERE" } else { "AND" };
            let _ = write!(sql, " {keyword} {} LIKE {{{}}}", filter.column, filter.placeholder);
        }
        if !self.order_by.is_empty() {
            let keys: Vec<String> = self.order_by.iter().map(|key| format!("{key} ASC")).collect();
            let _ = write!(sql, " ORDER BY {}", keys.join(", "));
        }
        sql
    }

    /// Binds one pattern per filter, in filter order, as literals.
    ///
    /// Missing trailing patterns default to [`MATCH_ALL`]. Extra patterns are
    /// ignored by construction: they have no placeholder to fill.
    pub fn params(&self, patterns: &[&str]) -> QueryParams {
        self.filters
            .iter()
            .enumerate()
            .fold(QueryParams::new(), |params, (i, filter)| {
                let pattern = patterns.get(i).copied().unwrap_or(MATCH_ALL);
                params.literal(filter.placeholder, pattern)
            })
    }
}

pub const SCHEMAS: CatalogQuery = CatalogQuery {
    name: "list_schemas",
    view: "sys.exa_schemas",
    filters: &[filter("schema_name", "schema_name_pattern")],
    order_by: &["schema_name"],
};

pub const TABLES: CatalogQuery = CatalogQuery {
    name: "list_tables",
    view: "sys.exa_all_tables",
    filters: &[
        filter("table_schema", "table_schema_pattern"),
        filter("table_name", "table_name_pattern"),
    ],
    order_by: &["table_schema", "table_name"],
};

pub const VIEWS: CatalogQuery = CatalogQuery {
    name: "list_views",
    view: "sys.exa_all_views",
    filters: &[
        filter("view_schema", "view_schema_pattern"),
        filter("view_name", "view_name_pattern"),
    ],
    order_by: &["view_schema", "view_name"],
};

pub const COLUMNS: CatalogQuery = CatalogQuery {
    name: "list_columns",
    view: "sys.exa_all_columns",
    filters: &[
        filter("column_schema", "column_schema_pattern"),
        filter("column_table", "column_table_pattern"),
        filter("column_name", "column_name_pattern"),
    ],
    order_by: &["column_schema", "column_table", "column_ordinal_position"],
};

pub const OBJECTS: CatalogQuery = CatalogQuery {
    name: "list_objects",
    view: "sys.exa_all_objects",
    filters: &[
        filter("object_name", "object_name_pattern"),
        filter("object_type", "object_type_pattern"),
        filter("owner", "owner_pattern"),
        filter("root_name", "root_name_pattern"),
    ],
    order_by: &["root_name", "object_name"],
};

pub const OBJECT_SIZES: CatalogQuery = CatalogQuery {
    name: "list_object_sizes",
    view: "sys.exa_all_object_sizes",
    filters: &[
        filter("object_name", "object_name_pattern"),
        filter("object_type", "object_type_pattern"),
        filter("owner", "owner_pattern"),
        filter("root_name", "root_name_pattern"),
    ],
    order_by: &["root_name", "object_name"],
};

pub const INDICES: CatalogQuery = CatalogQuery {
    name: "list_indices",
    view: "sys.exa_all_indices",
    filters: &[
        filter("index_schema", "index_schema_pattern"),
        filter("index_table", "index_table_pattern"),
        filter("index_owner", "index_owner_pattern"),
    ],
    order_by: &["index_schema", "index_table"],
};

/// Every listing definition.
pub const ALL_QUERIES: &[CatalogQuery] = &[
    SCHEMAS,
    TABLES,
    VIEWS,
    COLUMNS,
    OBJECTS,
    OBJECT_SIZES,
    INDICES,
];

/// A `SELECT 1` probe for one kind of catalog object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistenceProbe {
    pub name: &'static str,
    pub view: &'static str,
    /// Column holding the owning schema; `None` for schemas themselves.
    pub schema_column: Option<&'static str>,
    pub name_column: &'static str,
}

impl ExistenceProbe {
    pub const SCHEMA_PLACEHOLDER: &'static str = "object_schema";
    pub const NAME_PLACEHOLDER: &'static str = "object_name";

    pub fn template(&self) -> String {
        let mut sql = format!("SELECT 1 FROM {} WHERE ", self.view);
        if let Some(column) = self.schema_column {
            let _ = write!(sql, "{column} = {{{}}} AND ", Self::SCHEMA_PLACEHOLDER);
        }
        let _ = write!(sql, "{} = {{{}}}", self.name_column, Self::NAME_PLACEHOLDER);
        sql
    }

    /// Binds the (already normalized) schema and object name as literals.
    pub fn params(&self, schema: &str, name: &str) -> QueryParams {
        let params = QueryParams::new().literal(Self::NAME_PLACEHOLDER, name);
        match self.schema_column {
            Some(_) => params.literal(Self::SCHEMA_PLACEHOLDER, schema),
            None => params,
        }
    }
}

pub const SCHEMA_EXISTS: ExistenceProbe = ExistenceProbe {
    name: "schema_exists",
    view: "sys.exa_schemas",
    schema_column: None,
    name_column: "schema_name",
};

pub const TABLE_EXISTS: ExistenceProbe = ExistenceProbe {
    name: "table_exists",
    view: "sys.exa_all_tables",
    schema_column: Some("table_schema"),
    name_column: "table_name",
};

pub const VIEW_EXISTS: ExistenceProbe = ExistenceProbe {
    name: "view_exists",
    view: "sys.exa_all_views",
    schema_column: Some("view_schema"),
    name_column: "view_name",
};
