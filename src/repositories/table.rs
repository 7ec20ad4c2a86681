// src/repositories/table.rs
//
// Descriptor-driven SQL for any entity table.
//
// Table and column names are only ever taken from the static registry,
// never from user input; user values are always bound as parameters.

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, Row, ToSql};

use crate::domain::value::{format_timestamp, parse_timestamp};
use crate::domain::{Entity, EntityDescriptor, FieldDescriptor, FieldType, FieldValue, RecordKey};
use crate::error::{AppError, AppResult};

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Null => ToSqlOutput::Owned(Value::Null),
            FieldValue::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            FieldValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            FieldValue::Timestamp(dt) => ToSqlOutput::Owned(Value::Text(format_timestamp(dt))),
        })
    }
}

/// Read one column according to its declared type
fn read_value(row: &Row, index: usize, field: &FieldDescriptor) -> rusqlite::Result<FieldValue> {
    Ok(match field.field_type {
        FieldType::Integer => FieldValue::optional_integer(row.get::<_, Option<i64>>(index)?),
        FieldType::Text => match row.get::<_, Option<String>>(index)? {
            Some(s) => FieldValue::Text(s),
            None => FieldValue::Null,
        },
        FieldType::Timestamp => match row.get::<_, Option<String>>(index)? {
            Some(s) => {
                let dt = parse_timestamp(&s).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        index,
                        rusqlite::types::Type::Text,
                        Box::new(std::io::Error::new(
                            std::io::ErrorKind::InvalidData,
                            format!("Invalid {} timestamp '{}'", field.name, s),
                        )),
                    )
                })?;
                FieldValue::timestamp(dt)
            }
            None => FieldValue::Null,
        },
    })
}

fn read_row(row: &Row, descriptor: &EntityDescriptor) -> rusqlite::Result<Vec<FieldValue>> {
    descriptor
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| read_value(row, index, field))
        .collect()
}

fn query<T: Entity>(conn: &Connection, sql: &str, params: &[FieldValue]) -> AppResult<Vec<T>> {
    let descriptor = T::descriptor();
    let mut stmt = conn.prepare(sql)?;

    let rows: Vec<Vec<FieldValue>> = stmt
        .query_map(params_from_iter(params.iter()), |row| read_row(row, descriptor))?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(T::from_values).collect()
}

/// `k1 = ?n AND k2 = ?n+1 ...` with placeholders starting at `first`
fn key_predicate(descriptor: &EntityDescriptor, first: usize) -> String {
    descriptor
        .key_fields()
        .enumerate()
        .map(|(i, field)| format!("{} = ?{}", field.name, first + i))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn order_clause(descriptor: &EntityDescriptor, order_by: Option<&FieldDescriptor>) -> String {
    match order_by {
        Some(field) if !field.key => format!("{}, {}", field.name, descriptor.key_columns()),
        Some(field) => {
            let rest: Vec<&str> = descriptor
                .key_fields()
                .filter(|k| k.name != field.name)
                .map(|k| k.name)
                .collect();
            if rest.is_empty() {
                field.name.to_string()
            } else {
                format!("{}, {}", field.name, rest.join(", "))
            }
        }
        None => descriptor.key_columns(),
    }
}

/// Reject keys of the wrong shape before they reach SQL
pub fn check_key<T: Entity>(key: &RecordKey) -> AppResult<()> {
    if !key.fits(T::KIND) {
        return Err(AppError::invalid_value(
            T::descriptor().key_columns(),
            key.to_string(),
            format!("not a {} key", T::KIND.title()),
        ));
    }
    Ok(())
}

pub fn select_all<T: Entity>(conn: &Connection) -> AppResult<Vec<T>> {
    let d = T::descriptor();
    let sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        d.columns(),
        d.table,
        order_clause(d, None)
    );
    query(conn, &sql, &[])
}

/// Rows with `low <= field <= high`, ordered by `order_by`
pub fn select_in_range<T: Entity>(
    conn: &Connection,
    field: &FieldDescriptor,
    low: i64,
    high: i64,
    order_by: &FieldDescriptor,
) -> AppResult<Vec<T>> {
    let d = T::descriptor();
    let sql = format!(
        "SELECT {} FROM {} WHERE {} BETWEEN ?1 AND ?2 ORDER BY {}",
        d.columns(),
        d.table,
        field.name,
        order_clause(d, Some(order_by))
    );
    query(conn, &sql, &[FieldValue::Integer(low), FieldValue::Integer(high)])
}

/// Rows whose text `field` contains `needle`, ignoring case
pub fn select_matching<T: Entity>(
    conn: &Connection,
    field: &FieldDescriptor,
    needle: &str,
    order_by: &FieldDescriptor,
) -> AppResult<Vec<T>> {
    let d = T::descriptor();
    let sql = format!(
        "SELECT {} FROM {} WHERE instr(casefold({}), casefold(?1)) > 0 ORDER BY {}",
        d.columns(),
        d.table,
        field.name,
        order_clause(d, Some(order_by))
    );
    query(conn, &sql, &[FieldValue::Text(needle.to_string())])
}

pub fn select_by_key<T: Entity>(conn: &Connection, key: &RecordKey) -> AppResult<Option<T>> {
    check_key::<T>(key)?;
    let d = T::descriptor();
    let sql = format!(
        "SELECT {} FROM {} WHERE {}",
        d.columns(),
        d.table,
        key_predicate(d, 1)
    );
    Ok(query::<T>(conn, &sql, &key.values())?.into_iter().next())
}

pub fn exists<T: Entity>(conn: &Connection, key: &RecordKey) -> AppResult<bool> {
    check_key::<T>(key)?;
    let d = T::descriptor();
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {})",
        d.table,
        key_predicate(d, 1)
    );
    let found: bool = conn.query_row(&sql, params_from_iter(key.values().iter()), |row| row.get(0))?;
    Ok(found)
}

pub fn insert<T: Entity>(conn: &Connection, entity: &T) -> AppResult<()> {
    let d = T::descriptor();
    let placeholders: Vec<String> = (1..=d.fields.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        d.table,
        d.columns(),
        placeholders.join(", ")
    );
    conn.execute(&sql, params_from_iter(entity.values().iter()))?;
    Ok(())
}

/// Overwrite the row identified by `key` with every column of `entity`
pub fn update<T: Entity>(conn: &Connection, key: &RecordKey, entity: &T) -> AppResult<bool> {
    check_key::<T>(key)?;
    let d = T::descriptor();
    let assignments: Vec<String> = d
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| format!("{} = ?{}", field.name, i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        d.table,
        assignments.join(", "),
        key_predicate(d, d.fields.len() + 1)
    );

    let mut params = entity.values();
    params.extend(key.values());
    let changed = conn.execute(&sql, params_from_iter(params.iter()))?;
    Ok(changed > 0)
}

pub fn delete<T: Entity>(conn: &Connection, key: &RecordKey) -> AppResult<bool> {
    check_key::<T>(key)?;
    let d = T::descriptor();
    let sql = format!("DELETE FROM {} WHERE {}", d.table, key_predicate(d, 1));
    let removed = conn.execute(&sql, params_from_iter(key.values().iter()))?;
    Ok(removed > 0)
}

fn single_key<T: Entity>() -> AppResult<&'static FieldDescriptor> {
    let d = T::descriptor();
    let mut keys = d.key_fields();
    match (keys.next(), keys.next()) {
        (Some(key), None) if key.field_type == FieldType::Integer => Ok(key),
        _ => Err(AppError::PreconditionNotMet(format!(
            "{} has no single integer key",
            d.title
        ))),
    }
}

/// Largest key in use, or 0 for an empty table
pub fn max_id<T: Entity>(conn: &Connection) -> AppResult<i64> {
    let key = single_key::<T>()?;
    let sql = format!("SELECT COALESCE(MAX({}), 0) FROM {}", key.name, T::descriptor().table);
    let max: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(max)
}

/// Every key in use, ascending
pub fn ids<T: Entity>(conn: &Connection) -> AppResult<Vec<i64>> {
    let key = single_key::<T>()?;
    let sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        key.name,
        T::descriptor().table,
        key.name
    );
    let mut stmt = conn.prepare(&sql)?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}
