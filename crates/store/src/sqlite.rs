use owlset_graph::{Edge, EdgeKind, GraphStore, Node, NodeKind, StoreError};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const NODE_COLUMNS: &str = "id, name, kind, file_path, start_line, end_line, code, summary";

/// Graph store in a single SQLite file
pub struct SqliteGraphStore {
    conn: Mutex<Connection>,
}

impl SqliteGraphStore {
    /// Open (or create) the database at `path`, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path).map_err(backend)?;
        log::debug!("Opened graph store at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        Self::configure_pragmas(&conn)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// WAL lets readers in other processes run while a scan writes
    fn configure_pragmas(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )
        .map_err(backend)
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS nodes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                file_path TEXT NOT NULL,
                start_line INTEGER NOT NULL,
                end_line INTEGER NOT NULL,
                code TEXT NOT NULL,
                summary TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_nodes_name ON nodes(name);

            CREATE TABLE IF NOT EXISTS edges (
                source_id TEXT NOT NULL,
                target_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                PRIMARY KEY (source_id, target_id, kind)
            );

            CREATE INDEX IF NOT EXISTS idx_edges_target ON edges(target_id);
            ",
        )
        .map_err(backend)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl GraphStore for SqliteGraphStore {
    fn upsert_node(&self, node: &Node) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            r"
            INSERT INTO nodes (id, name, kind, file_path, start_line, end_line, code, summary)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                kind = excluded.kind,
                file_path = excluded.file_path,
                start_line = excluded.start_line,
                end_line = excluded.end_line,
                code = excluded.code,
                summary = COALESCE(nodes.summary, excluded.summary)
            ",
            params![
                node.id,
                node.name,
                node.kind.as_str(),
                node.file_path,
                to_sql_line(node.start_line),
                to_sql_line(node.end_line),
                node.code,
                node.summary,
            ],
        )
        .map_err(backend)?;
        Ok(())
    }

    fn add_edge(&self, source: &str, target: &str, kind: EdgeKind) -> Result<(), StoreError> {
        if source.is_empty() || target.is_empty() {
            log::debug!("Ignoring {kind} edge with empty endpoint: '{source}' -> '{target}'");
            return Ok(());
        }
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO edges (source_id, target_id, kind) VALUES (?1, ?2, ?3)",
            params![source, target, kind.as_str()],
        )
        .map_err(backend)?;
        Ok(())
    }

    fn get_all_nodes(&self) -> Result<Vec<Node>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {NODE_COLUMNS} FROM nodes ORDER BY id"))
            .map_err(backend)?;
        let rows = stmt.query_map([], row_to_node).map_err(backend)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(backend)
    }

    fn get_edges(&self) -> Result<Vec<Edge>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT source_id, target_id, kind FROM edges ORDER BY source_id, target_id, kind",
            )
            .map_err(backend)?;
        let rows = stmt.query_map([], row_to_edge).map_err(backend)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(backend)
    }

    fn get_node(&self, id: &str) -> Result<Option<Node>, StoreError> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {NODE_COLUMNS} FROM nodes WHERE id = ?1"),
            params![id],
            row_to_node,
        )
        .optional()
        .map_err(backend)
    }

    fn get_summary(&self, id: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn()?;
        let summary: Option<Option<String>> = conn
            .query_row(
                "SELECT summary FROM nodes WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(backend)?;
        Ok(summary.flatten())
    }

    fn update_summary(&self, id: &str, summary: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let updated = conn
            .execute(
                "UPDATE nodes SET summary = ?2 WHERE id = ?1",
                params![id, summary],
            )
            .map_err(backend)?;
        if updated == 0 {
            log::debug!("No node {id} to attach a summary to");
        }
        Ok(())
    }
}

fn backend(err: rusqlite::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn to_sql_line(line: usize) -> i64 {
    i64::try_from(line).unwrap_or(i64::MAX)
}

fn from_sql_line(value: i64) -> usize {
    usize::try_from(value).unwrap_or_default()
}

fn row_to_node(row: &Row<'_>) -> rusqlite::Result<Node> {
    let kind: String = row.get(2)?;
    let kind = NodeKind::parse(&kind).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("unknown node kind '{kind}'").into(),
        )
    })?;
    Ok(Node {
        id: row.get(0)?,
        name: row.get(1)?,
        kind,
        file_path: row.get(3)?,
        start_line: from_sql_line(row.get(4)?),
        end_line: from_sql_line(row.get(5)?),
        code: row.get(6)?,
        summary: row.get(7)?,
    })
}

fn row_to_edge(row: &Row<'_>) -> rusqlite::Result<Edge> {
    let kind: String = row.get(2)?;
    let kind = EdgeKind::parse(&kind).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("unknown edge kind '{kind}'").into(),
        )
    })?;
    Ok(Edge {
        source_id: row.get(0)?,
        target_id: row.get(1)?,
        kind,
    })
}
