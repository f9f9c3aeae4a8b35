//! End-to-end generation from a metadata document.

use std::io::Write;

use drizzlegen_core::{
    generate, generate_tables, ColumnMetadata, ColumnType, DefaultClause, MetadataDocument,
    RenderOptions, TableMetadata,
};
use pretty_assertions::assert_eq;

const SHOP_METADATA: &str = r#"{
  "tables": [
    {
      "table_name": "storefront_config",
      "columns": [
        {"column_name": "theme", "data_type": "text", "udt_name": "text",
         "column_default": "'organic'::text", "is_nullable": "NO", "ordinal_position": 3},
        {"column_name": "id", "data_type": "character varying", "udt_name": "varchar",
         "column_default": "gen_random_uuid()", "is_nullable": "NO", "ordinal_position": 1},
        {"column_name": "name", "data_type": "text", "udt_name": "text",
         "is_nullable": "NO", "ordinal_position": 2},
        {"column_name": "top_products_count", "data_type": "integer", "udt_name": "int4",
         "column_default": "10", "is_nullable": "NO", "ordinal_position": 4},
        {"column_name": "is_active", "data_type": "boolean", "udt_name": "bool",
         "column_default": "true", "is_nullable": "NO", "ordinal_position": 5},
        {"column_name": "selected_product_ids", "data_type": "jsonb", "udt_name": "jsonb",
         "column_default": "'[]'::jsonb", "is_nullable": "YES", "ordinal_position": 6},
        {"column_name": "updated_at", "data_type": "timestamp without time zone",
         "udt_name": "timestamp", "column_default": "now()", "is_nullable": "YES",
         "ordinal_position": 7}
      ]
    },
    {
      "table_name": "orders",
      "columns": [
        {"column_name": "id", "data_type": "integer", "udt_name": "serial4",
         "is_nullable": "NO", "ordinal_position": 1},
        {"column_name": "total", "data_type": "numeric", "udt_name": "numeric",
         "numeric_precision": 15, "numeric_scale": 2, "is_nullable": "NO", "ordinal_position": 2},
        {"column_name": "source", "data_type": "text", "udt_name": "text",
         "column_default": "'admin'::text", "is_nullable": "NO", "ordinal_position": 3},
        {"column_name": "source_order_id", "data_type": "text", "udt_name": "text",
         "is_nullable": "YES", "ordinal_position": 4},
        {"column_name": "location", "data_type": "USER-DEFINED", "udt_name": "geometry",
         "is_nullable": "YES", "ordinal_position": 5}
      ]
    }
  ],
  "primary_keys": {"storefront_config": ["id"], "orders": ["id"]},
  "unique_constraints": [
    {"table_name": "storefront_config", "column_names": ["name"],
     "constraint_name": "storefront_config_name_unique"},
    {"table_name": "orders", "column_names": ["source", "source_order_id"],
     "constraint_name": "orders_source_source_order_id_unique"}
  ]
}"#;

const EXPECTED_MODULE: &str = r#"import { pgTable, unique, varchar, text, integer, serial, numeric, boolean, timestamp, jsonb } from "drizzle-orm/pg-core"
import { sql } from "drizzle-orm"

export const storefrontConfig = pgTable("storefront_config", {
	id: varchar().default(sql`gen_random_uuid()`).primaryKey(),
	name: text().notNull(),
	theme: text().default('organic').notNull(),
	topProductsCount: integer("top_products_count").default(10).notNull(),
	isActive: boolean("is_active").default(true).notNull(),
	selectedProductIds: jsonb("selected_product_ids").default([]),
	updatedAt: timestamp("updated_at", { mode: "string" }).defaultNow(),
}, (table) => [
	unique("storefront_config_name_unique").on(table.name),
]);

export const orders = pgTable("orders", {
	id: serial().primaryKey(),
	total: numeric({ precision: 15, scale: 2 }).notNull(),
	source: text().default('admin').notNull(),
	sourceOrderId: text("source_order_id"),
	location: text(),
}, (table) => [
	unique("orders_source_source_order_id_unique").on(table.source, table.sourceOrderId),
]);
"#;

#[test]
fn test_generate_shop_module() {
    let document = MetadataDocument::from_json(SHOP_METADATA).unwrap();
    let source = generate(document, &RenderOptions::default()).unwrap();

    assert_eq!(source, EXPECTED_MODULE);
}

#[test]
fn test_every_column_emitted_once_in_order() {
    let tables = MetadataDocument::from_json(SHOP_METADATA)
        .unwrap()
        .into_tables()
        .unwrap();
    let generated = generate_tables(&tables);

    for (table, output) in tables.iter().zip(&generated) {
        assert_eq!(output.fields.len(), table.columns.len());
        let positions: Vec<u32> = output.fields.iter().map(|f| f.ordinal_position).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }
}

#[test]
fn test_unknown_type_degrades_without_error() {
    let tables = MetadataDocument::from_json(SHOP_METADATA)
        .unwrap()
        .into_tables()
        .unwrap();
    let orders = &generate_tables(&tables)[1];

    assert_eq!(orders.fallback_count(), 1);
    let location = orders.fields.iter().find(|f| f.column_name == "location").unwrap();
    assert_eq!(location.column_type, ColumnType::Text);
}

#[test]
fn test_spec_examples() {
    let table = TableMetadata::new(
        "events",
        [
            ColumnMetadata::new("id", "integer", "serial4", 1).not_null(),
            ColumnMetadata::new("created_at", "timestamp without time zone", "timestamp", 2)
                .with_default("now()")
                .not_null(),
            ColumnMetadata::new("payload", "jsonb", "jsonb", 3).with_default("'{}'::jsonb"),
            ColumnMetadata::new("status", "character varying", "varchar", 4)
                .with_default("'active'::character varying"),
            ColumnMetadata::new("amount", "numeric", "numeric", 5).with_precision(Some(10), None),
        ],
    )
    .with_primary_key(["id"]);

    let fields = &generate_tables(&[table])[0].fields;

    assert_eq!(fields[0].column_type, ColumnType::Serial);
    assert!(fields[0].primary_key && !fields[0].not_null);

    assert_eq!(fields[1].default, Some(DefaultClause::Now));
    assert!(fields[1].not_null && !fields[1].primary_key);

    assert_eq!(fields[2].default, Some(DefaultClause::Json("{}".into())));
    assert_eq!(fields[3].default, Some(DefaultClause::String("active".into())));
    assert_eq!(
        fields[4].column_type,
        ColumnType::Numeric {
            precision_scale: None
        }
    );
}

#[test]
fn test_document_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SHOP_METADATA.as_bytes()).unwrap();

    let document = MetadataDocument::from_path(file.path()).unwrap();
    assert_eq!(document.tables.len(), 2);
}

#[test]
fn test_duplicate_columns_rejected() {
    let document = MetadataDocument::from_json(
        r#"{"tables": [{"table_name": "t", "columns": [
            {"column_name": "a", "data_type": "text", "is_nullable": true, "ordinal_position": 1},
            {"column_name": "a", "data_type": "text", "is_nullable": true, "ordinal_position": 2}
        ]}]}"#,
    )
    .unwrap();

    assert!(generate(document, &RenderOptions::default()).is_err());
}

#[test]
fn test_colliding_field_names_rejected() {
    let document = MetadataDocument::from_json(
        r#"{"tables": [{"table_name": "accounts", "columns": [
            {"column_name": "user_id", "data_type": "integer", "udt_name": "int4", "is_nullable": true, "ordinal_position": 1},
            {"column_name": "userId", "data_type": "integer", "udt_name": "int4", "is_nullable": true, "ordinal_position": 2}
        ]}]}"#,
    )
    .unwrap();

    let err = generate(document, &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, drizzlegen_core::Error::InvalidMetadata(_)), "{err}");
}

#[test]
fn test_quoted_negative_defaults_render_as_numbers() {
    let document = MetadataDocument::from_json(
        r#"{"tables": [{"table_name": "wallets", "columns": [
            {"column_name": "balance", "data_type": "integer", "udt_name": "int4",
             "column_default": "'-1'::integer", "is_nullable": "NO", "ordinal_position": 1},
            {"column_name": "rate", "data_type": "numeric", "udt_name": "numeric",
             "column_default": "'-1.5'::numeric", "is_nullable": "YES", "ordinal_position": 2}
        ]}]}"#,
    )
    .unwrap();

    let source = generate(document, &RenderOptions::default()).unwrap();
    assert!(source.contains("\tbalance: integer().default(-1).notNull(),\n"), "{source}");
    assert!(source.contains("\trate: numeric().default(-1.5),\n"), "{source}");
}
