use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    bootstrap_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("database connection already initialized"))?;

    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("database connection not initialized; call initialize_database first")
}

async fn table_exists(conn: &DatabaseConnection, name: &str) -> anyhow::Result<bool> {
    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type='table' AND name = ?",
            [name.into()],
        ))
        .await?;
    Ok(!rows.is_empty())
}

async fn column_exists(
    conn: &DatabaseConnection,
    table: &str,
    column: &str,
) -> anyhow::Result<bool> {
    let pragma = format!("PRAGMA table_info('{}');", table);
    let rows = conn
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, pragma))
        .await?;
    for row in rows {
        let name: String = row.try_get("", "name").unwrap_or_default();
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Garantir que as tabelas de negócio existam (bootstrap mínimo de schema).
/// As tabelas do sistema (sys_*) são criadas em system::initialization.
async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let tables: &[(&str, &str)] = &[
        (
            "a001_product",
            r#"
            CREATE TABLE a001_product (
                id TEXT PRIMARY KEY NOT NULL,
                code TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                comment TEXT,
                categoria TEXT NOT NULL DEFAULT '',
                unidade_medida TEXT NOT NULL DEFAULT 'un',
                preco_unitario REAL NOT NULL DEFAULT 0,
                quantidade_atual REAL NOT NULL DEFAULT 0,
                kind TEXT NOT NULL DEFAULT 'simples',
                components_json TEXT,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                is_posted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#,
        ),
        (
            "a002_customer",
            r#"
            CREATE TABLE a002_customer (
                id TEXT PRIMARY KEY NOT NULL,
                code TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                comment TEXT,
                documento TEXT,
                cidade TEXT,
                telefone TEXT,
                email TEXT,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                is_posted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#,
        ),
        (
            "a003_sale",
            r#"
            CREATE TABLE a003_sale (
                id TEXT PRIMARY KEY NOT NULL,
                code TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                comment TEXT,
                customer_name TEXT NOT NULL,
                sale_date TEXT NOT NULL,
                lines_json TEXT NOT NULL DEFAULT '[]',
                total REAL NOT NULL DEFAULT 0,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                is_posted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#,
        ),
        (
            "a004_payment",
            r#"
            CREATE TABLE a004_payment (
                id TEXT PRIMARY KEY NOT NULL,
                code TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                comment TEXT,
                customer_name TEXT NOT NULL,
                payment_date TEXT NOT NULL,
                amount REAL NOT NULL DEFAULT 0,
                metodo TEXT,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                is_posted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#,
        ),
        (
            "a005_stock_movement",
            r#"
            CREATE TABLE a005_stock_movement (
                id TEXT PRIMARY KEY NOT NULL,
                code TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                comment TEXT,
                sku TEXT NOT NULL,
                kind TEXT NOT NULL DEFAULT 'entrada',
                quantity REAL NOT NULL DEFAULT 0,
                origem_tabela TEXT NOT NULL DEFAULT '',
                origem_id TEXT,
                observacao TEXT,
                saldo_apos REAL NOT NULL DEFAULT 0,
                moved_at TEXT NOT NULL,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                is_posted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#,
        ),
        (
            "a006_full_shipment",
            r#"
            CREATE TABLE a006_full_shipment (
                id TEXT PRIMARY KEY NOT NULL,
                code TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                comment TEXT,
                client_id TEXT NOT NULL,
                emitted_at TEXT,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                is_posted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#,
        ),
        (
            "a006_full_shipment_item",
            r#"
            CREATE TABLE a006_full_shipment_item (
                id TEXT PRIMARY KEY NOT NULL,
                code TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                comment TEXT,
                shipment_number TEXT NOT NULL,
                ml_code TEXT NOT NULL DEFAULT '',
                sku_text TEXT NOT NULL,
                qty REAL NOT NULL DEFAULT 0,
                match_status TEXT NOT NULL DEFAULT 'pending',
                matched_sku TEXT,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                is_posted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#,
        ),
        (
            "a007_sku_alias",
            r#"
            CREATE TABLE a007_sku_alias (
                id TEXT PRIMARY KEY NOT NULL,
                code TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                comment TEXT,
                alias_norm TEXT NOT NULL,
                stock_sku TEXT NOT NULL,
                learned_from TEXT,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                is_posted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#,
        ),
    ];

    for (name, ddl) in tables {
        if !table_exists(conn, name).await? {
            tracing::info!("Creating {} table", name);
            conn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                ddl.to_string(),
            ))
            .await?;
        }
    }

    // Bases antigas não tinham a composição de kit no produto
    if !column_exists(conn, "a001_product", "components_json").await? {
        tracing::info!("Adding components_json column to a001_product");
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "ALTER TABLE a001_product ADD COLUMN components_json TEXT;".to_string(),
        ))
        .await?;
    }

    // Índices de consulta mais frequentes
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_a001_code ON a001_product(code);",
        "CREATE INDEX IF NOT EXISTS idx_a003_customer ON a003_sale(customer_name);",
        "CREATE INDEX IF NOT EXISTS idx_a003_date ON a003_sale(sale_date);",
        "CREATE INDEX IF NOT EXISTS idx_a004_customer ON a004_payment(customer_name);",
        "CREATE INDEX IF NOT EXISTS idx_a005_sku ON a005_stock_movement(sku);",
        "CREATE INDEX IF NOT EXISTS idx_a006_item_shipment ON a006_full_shipment_item(shipment_number);",
        "CREATE INDEX IF NOT EXISTS idx_a007_alias ON a007_sku_alias(alias_norm);",
    ];
    for sql in indexes {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }

    Ok(())
}
