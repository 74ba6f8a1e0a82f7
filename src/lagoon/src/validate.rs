//! Operation validation.
//!
//! Raw `serde_json` input is checked against the schema registry for the
//! target operation kind and normalized into the canonical records of
//! [`crate::ops`]. Errors are path-qualified (`data.author.create.name: …`).
//! Scalar conversion happens at the leaves through [`crate::transform`].

use crate::ops::*;
use crate::transform;
use crate::{Error, Result, Schema, Value};

use lagoon_core::schema::Relation;

use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

type JsonMap = Map<String, Json>;

/// Whether a `_count` aggregator in `select`/`include` is stripped (create
/// and update subtrees) or rejected (read paths).
#[derive(Clone, Copy, PartialEq)]
enum CountMode {
    Strip,
    Reject,
}

pub(crate) fn create(schema: &Schema, table: &str, input: &Json) -> Result<CreateOp> {
    let map = input_object(input)?;
    check_keys(map, &["data", "select", "include"], "")?;

    Ok(CreateOp {
        table: table.to_string(),
        data: create_data(schema, table, required(map, "data")?, "data")?,
        select: opt_select(schema, table, map.get("select"), "select", CountMode::Strip)?,
        include: opt_include(schema, table, map.get("include"), "include", CountMode::Strip)?,
    })
}

pub(crate) fn create_many(schema: &Schema, table: &str, input: &Json) -> Result<CreateManyOp> {
    let map = input_object(input)?;
    check_keys(map, &["data"], "")?;

    let data = required(map, "data")?;
    let items = data
        .as_array()
        .ok_or_else(|| Error::invalid_argument("data: expected an array of objects"))?;

    let mut rows = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let row = scalar_data(schema, table, item, &format!("data[{i}]"))?;
        if row.is_empty() {
            return Err(Error::invalid_argument(format!(
                "data[{i}]: at least one field required"
            )));
        }
        rows.push(row);
    }

    Ok(CreateManyOp {
        table: table.to_string(),
        rows,
    })
}

pub(crate) fn find_unique(schema: &Schema, table: &str, input: &Json) -> Result<FindUniqueOp> {
    let map = input_object(input)?;
    check_keys(map, &["where", "select", "include"], "")?;

    Ok(FindUniqueOp {
        table: table.to_string(),
        r#where: unique_where(schema, table, required(map, "where")?, "where")?,
        select: opt_select(schema, table, map.get("select"), "select", CountMode::Reject)?,
        include: opt_include(schema, table, map.get("include"), "include", CountMode::Reject)?,
    })
}

/// Shared by `find_first` and `find_many`; both accept the full non-unique
/// find argument set. An absent input is an unfiltered find.
pub(crate) fn find_non_unique(schema: &Schema, table: &str, input: &Json) -> Result<FindManyOp> {
    if input.is_null() {
        schema.table(table)?;
        return Ok(FindManyOp {
            table: table.to_string(),
            ..Default::default()
        });
    }

    find_args(schema, table, input, "", CountMode::Reject)
}

pub(crate) fn update(schema: &Schema, table: &str, input: &Json) -> Result<UpdateOp> {
    let map = input_object(input)?;
    check_keys(map, &["where", "data", "select", "include"], "")?;

    Ok(UpdateOp {
        table: table.to_string(),
        r#where: unique_where(schema, table, required(map, "where")?, "where")?,
        data: update_data(schema, table, required(map, "data")?, "data")?,
        select: opt_select(schema, table, map.get("select"), "select", CountMode::Strip)?,
        include: opt_include(schema, table, map.get("include"), "include", CountMode::Strip)?,
    })
}

pub(crate) fn update_many(schema: &Schema, table: &str, input: &Json) -> Result<UpdateManyOp> {
    let map = input_object(input)?;
    check_keys(map, &["where", "data"], "")?;

    let data = scalar_data(schema, table, required(map, "data")?, "data")?;
    if data.is_empty() {
        return Err(Error::invalid_argument("data: at least one field required"));
    }

    Ok(UpdateManyOp {
        table: table.to_string(),
        r#where: opt_filter(schema, table, map.get("where"), "where")?,
        data,
    })
}

pub(crate) fn upsert(schema: &Schema, table: &str, input: &Json) -> Result<UpsertOp> {
    let map = input_object(input)?;
    check_keys(map, &["where", "create", "update", "select", "include"], "")?;

    Ok(UpsertOp {
        table: table.to_string(),
        r#where: unique_where(schema, table, required(map, "where")?, "where")?,
        create: create_data(schema, table, required(map, "create")?, "create")?,
        update: update_data(schema, table, required(map, "update")?, "update")?,
        select: opt_select(schema, table, map.get("select"), "select", CountMode::Strip)?,
        include: opt_include(schema, table, map.get("include"), "include", CountMode::Strip)?,
    })
}

pub(crate) fn delete(schema: &Schema, table: &str, input: &Json) -> Result<DeleteOp> {
    let map = input_object(input)?;
    check_keys(map, &["where"], "")?;

    Ok(DeleteOp {
        table: table.to_string(),
        r#where: unique_where(schema, table, required(map, "where")?, "where")?,
    })
}

pub(crate) fn delete_many(schema: &Schema, table: &str, input: &Json) -> Result<DeleteManyOp> {
    if input.is_null() {
        schema.table(table)?;
        return Ok(DeleteManyOp {
            table: table.to_string(),
            r#where: None,
        });
    }

    let map = input_object(input)?;
    check_keys(map, &["where"], "")?;

    Ok(DeleteManyOp {
        table: table.to_string(),
        r#where: opt_filter(schema, table, map.get("where"), "where")?,
    })
}

pub(crate) fn sync(schema: &Schema, table: &str, input: &Json) -> Result<SyncOp> {
    if input.is_null() {
        schema.table(table)?;
        return Ok(SyncOp {
            table: table.to_string(),
            r#where: None,
            include: None,
            key: None,
        });
    }

    let map = input_object(input)?;
    check_keys(map, &["where", "include", "key"], "")?;

    let r#where = match map.get("where") {
        None | Some(Json::Null) => None,
        Some(Json::String(raw)) => Some(SyncWhere::Raw(raw.clone())),
        Some(json) => Some(SyncWhere::Object(sync_filter(schema, table, json, "where")?)),
    };

    let key = match map.get("key") {
        None | Some(Json::Null) => None,
        Some(Json::String(key)) => Some(key.clone()),
        Some(_) => return Err(Error::invalid_argument("key: expected a string")),
    };

    Ok(SyncOp {
        table: table.to_string(),
        r#where,
        include: opt_include(schema, table, map.get("include"), "include", CountMode::Reject)?,
        key,
    })
}

/// The scalar-only `where` subset accepted by `sync`: field conditions only,
/// no relation traversal, no boolean combinators.
fn sync_filter(schema: &Schema, table: &str, json: &Json, path: &str) -> Result<Filter> {
    let map = as_object(json, path)?;
    let desc = schema.table(table)?;
    let mut conjuncts = vec![];

    for (key, value) in map {
        let kpath = join(path, key);

        if desc.relation_for_field(key).is_some() {
            return Err(Error::invalid_argument(format!(
                "{kpath}: relation filters are not supported in sync"
            )));
        }
        if matches!(key.as_str(), "AND" | "OR" | "NOT") {
            return Err(Error::invalid_argument(format!(
                "{kpath}: boolean combinators are not supported in sync"
            )));
        }

        let field = desc
            .field(key)
            .ok_or_else(|| unknown_field(&kpath, table))?;
        for cond in field_conds(field, value, &kpath)? {
            conjuncts.push(Filter::Cond(key.clone(), cond));
        }
    }

    Ok(Filter::And(conjuncts))
}

fn find_args(
    schema: &Schema,
    table: &str,
    json: &Json,
    path: &str,
    count: CountMode,
) -> Result<FindManyOp> {
    let map = as_object(json, path)?;
    check_keys(map, &["where", "select", "include", "orderBy", "take", "skip"], path)?;

    Ok(FindManyOp {
        table: table.to_string(),
        r#where: opt_filter(schema, table, map.get("where"), &join(path, "where"))?,
        select: opt_select(schema, table, map.get("select"), &join(path, "select"), count)?,
        include: opt_include(schema, table, map.get("include"), &join(path, "include"), count)?,
        order_by: order_by(schema, table, map.get("orderBy"), &join(path, "orderBy"))?,
        take: non_negative(map.get("take"), &join(path, "take"))?,
        skip: non_negative(map.get("skip"), &join(path, "skip"))?,
    })
}

/// An equality-only `where` that must identify at most one row: at least one
/// of its fields carries a uniqueness guarantee.
pub(crate) fn unique_where(
    schema: &Schema,
    table: &str,
    json: &Json,
    path: &str,
) -> Result<UniqueWhere> {
    let map = as_object(json, path)?;
    let desc = schema.table(table)?;
    let mut where_clause = UniqueWhere::new();
    let mut unique = false;

    for (key, value) in map {
        let kpath = join(path, key);
        let field = desc
            .field(key)
            .ok_or_else(|| unknown_field(&kpath, table))?;

        if value.is_object() || value.is_array() {
            return Err(Error::invalid_argument(format!(
                "{kpath}: expected a scalar value"
            )));
        }

        unique |= field.unique;
        where_clause.insert(key.clone(), transform::to_db_value(field, value, &kpath)?);
    }

    if where_clause.is_empty() {
        return Err(Error::invalid_argument(format!("{path}: cannot be empty")));
    }
    if !unique {
        return Err(Error::invalid_argument(format!(
            "{path}: fields do not identify a unique row on `{table}`"
        )));
    }

    Ok(where_clause)
}

fn opt_filter(
    schema: &Schema,
    table: &str,
    json: Option<&Json>,
    path: &str,
) -> Result<Option<Filter>> {
    match json {
        None | Some(Json::Null) => Ok(None),
        Some(json) => match filter(schema, table, json, path)? {
            Filter::And(conjuncts) if conjuncts.is_empty() => Ok(None),
            parsed => Ok(Some(parsed)),
        },
    }
}

fn filter(schema: &Schema, table: &str, json: &Json, path: &str) -> Result<Filter> {
    let map = as_object(json, path)?;
    let desc = schema.table(table)?;
    let mut conjuncts = vec![];

    for (key, value) in map {
        let kpath = join(path, key);
        match key.as_str() {
            "AND" => conjuncts.push(Filter::And(filter_list(schema, table, value, &kpath)?)),
            "OR" => conjuncts.push(Filter::Or(filter_list(schema, table, value, &kpath)?)),
            "NOT" => conjuncts.push(Filter::Not(filter_list(schema, table, value, &kpath)?)),
            _ => {
                let field = desc
                    .field(key)
                    .ok_or_else(|| unknown_field(&kpath, table))?;
                for cond in field_conds(field, value, &kpath)? {
                    conjuncts.push(Filter::Cond(key.clone(), cond));
                }
            }
        }
    }

    Ok(Filter::And(conjuncts))
}

fn filter_list(schema: &Schema, table: &str, json: &Json, path: &str) -> Result<Vec<Filter>> {
    match json {
        Json::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| filter(schema, table, item, &format!("{path}[{i}]")))
            .collect(),
        other => Ok(vec![filter(schema, table, other, path)?]),
    }
}

fn field_conds(
    field: &lagoon_core::schema::Field,
    json: &Json,
    path: &str,
) -> Result<Vec<Cond>> {
    use lagoon_core::schema::FieldType;

    let Some(map) = json.as_object() else {
        return Ok(vec![Cond::Eq(transform::to_db_value(field, json, path)?)]);
    };

    let mut conds = vec![];
    for (op, arg) in map {
        let opath = format!("{path}.{op}");
        let scalar = |arg: &Json| transform::to_db_value(field, arg, &opath);
        let list = |arg: &Json| -> Result<Vec<Value>> {
            let items = arg
                .as_array()
                .ok_or_else(|| Error::invalid_argument(format!("{opath}: expected an array")))?;
            items.iter().map(|item| scalar(item)).collect()
        };
        let text = |arg: &Json| -> Result<String> {
            if field.ty != FieldType::Text {
                return Err(Error::invalid_argument(format!(
                    "{opath}: only supported on text fields"
                )));
            }
            arg.as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::invalid_argument(format!("{opath}: expected a string")))
        };

        conds.push(match op.as_str() {
            "equals" => Cond::Eq(scalar(arg)?),
            "not" => Cond::Ne(scalar(arg)?),
            "in" => Cond::In(list(arg)?),
            "notIn" => Cond::NotIn(list(arg)?),
            "lt" => Cond::Lt(scalar(arg)?),
            "lte" => Cond::Lte(scalar(arg)?),
            "gt" => Cond::Gt(scalar(arg)?),
            "gte" => Cond::Gte(scalar(arg)?),
            "startsWith" => Cond::StartsWith(text(arg)?),
            "endsWith" => Cond::EndsWith(text(arg)?),
            "contains" => Cond::Contains(text(arg)?),
            _ => {
                return Err(Error::invalid_argument(format!(
                    "{opath}: unknown filter operator"
                )))
            }
        });
    }

    Ok(conds)
}

fn create_data(schema: &Schema, table: &str, json: &Json, path: &str) -> Result<CreateData> {
    let map = as_object(json, path)?;
    let desc = schema.table(table)?;
    let mut data = CreateData::default();

    for (key, value) in map {
        let kpath = join(path, key);
        if let Some(field) = desc.field(key) {
            data.scalars
                .insert(key.clone(), transform::to_db_value(field, value, &kpath)?);
        } else if let Some(relation) = desc.relation_for_field(key) {
            data.relations
                .insert(key.clone(), nested_create(schema, relation, value, &kpath)?);
        } else {
            return Err(unknown_field(&kpath, table));
        }
    }

    Ok(data)
}

fn nested_create(
    schema: &Schema,
    relation: &Relation,
    json: &Json,
    path: &str,
) -> Result<NestedCreate> {
    let map = as_object(json, path)?;
    if map.len() != 1 {
        return Err(Error::invalid_argument(format!(
            "{path}: expected exactly one nested operation"
        )));
    }

    let (key, value) = map.iter().next().expect("len checked above");
    match key.as_str() {
        "create" => {
            if relation.is_outgoing() && value.is_array() {
                return Err(Error::invalid_argument(format!(
                    "{path}.create: expected a single object"
                )));
            }

            let mut items = vec![];
            match value {
                Json::Array(elements) => {
                    for (i, element) in elements.iter().enumerate() {
                        items.push(create_data(
                            schema,
                            &relation.related_table,
                            element,
                            &format!("{path}.create[{i}]"),
                        )?);
                    }
                }
                other => items.push(create_data(
                    schema,
                    &relation.related_table,
                    other,
                    &format!("{path}.create"),
                )?),
            }
            Ok(NestedCreate::Create(items))
        }
        "connect" => Ok(NestedCreate::Connect),
        "connectOrCreate" => Ok(NestedCreate::ConnectOrCreate),
        "createMany" => Ok(NestedCreate::CreateMany),
        _ => Err(Error::invalid_argument(format!(
            "{path}.{key}: unexpected nested operation"
        ))),
    }
}

fn update_data(schema: &Schema, table: &str, json: &Json, path: &str) -> Result<UpdateData> {
    let map = as_object(json, path)?;
    let desc = schema.table(table)?;
    let mut data = UpdateData::default();

    for (key, value) in map {
        let kpath = join(path, key);
        if let Some(field) = desc.field(key) {
            data.scalars
                .insert(key.clone(), transform::to_db_value(field, value, &kpath)?);
        } else if let Some(relation) = desc.relation_for_field(key) {
            data.relations
                .insert(key.clone(), nested_update(schema, relation, value, &kpath)?);
        } else {
            return Err(unknown_field(&kpath, table));
        }
    }

    Ok(data)
}

fn nested_update(
    schema: &Schema,
    relation: &Relation,
    json: &Json,
    path: &str,
) -> Result<NestedUpdate> {
    let map = as_object(json, path)?;
    let mut nested = NestedUpdate::default();

    for (key, value) in map {
        let kpath = join(path, key);
        match key.as_str() {
            "update" => {
                match value {
                    Json::Array(items) => {
                        for (i, item) in items.iter().enumerate() {
                            nested.update.push(nested_update_item(
                                schema,
                                relation,
                                item,
                                &format!("{kpath}[{i}]"),
                            )?);
                        }
                    }
                    other => nested
                        .update
                        .push(nested_update_item(schema, relation, other, &kpath)?),
                };
            }
            "updateMany" => {
                if !relation.is_incoming() || !relation.is_many() {
                    return Err(Error::invalid_argument(format!(
                        "{kpath}: only supported on a to-many relation"
                    )));
                }
                match value {
                    Json::Array(items) => {
                        for (i, item) in items.iter().enumerate() {
                            nested.update_many.push(nested_update_many_item(
                                schema,
                                relation,
                                item,
                                &format!("{kpath}[{i}]"),
                            )?);
                        }
                    }
                    other => nested.update_many.push(nested_update_many_item(
                        schema, relation, other, &kpath,
                    )?),
                }
            }
            _ => {
                return Err(Error::invalid_argument(format!(
                    "{kpath}: unsupported nested operation in update"
                )))
            }
        }
    }

    Ok(nested)
}

fn nested_update_item(
    schema: &Schema,
    relation: &Relation,
    json: &Json,
    path: &str,
) -> Result<NestedUpdateItem> {
    let map = as_object(json, path)?;
    let to_many = relation.is_incoming() && relation.is_many();

    // `{where, data}` wraps the child update for to-many nesting; anywhere
    // else the object is the update data itself.
    let wrapped =
        map.contains_key("data") && map.keys().all(|k| k == "data" || k == "where");

    if wrapped {
        let r#where = map
            .get("where")
            .map(|w| unique_where(schema, &relation.related_table, w, &join(path, "where")))
            .transpose()?;

        if to_many && r#where.is_none() {
            return Err(Error::invalid_argument(format!(
                "{path}.where: required for a to-many nested update"
            )));
        }

        let data = update_data(
            schema,
            &relation.related_table,
            map.get("data").expect("checked above"),
            &join(path, "data"),
        )?;
        return Ok(NestedUpdateItem { r#where, data });
    }

    if to_many {
        return Err(Error::invalid_argument(format!(
            "{path}: expected {{where, data}} for a to-many nested update"
        )));
    }

    Ok(NestedUpdateItem {
        r#where: None,
        data: update_data(schema, &relation.related_table, json, path)?,
    })
}

fn nested_update_many_item(
    schema: &Schema,
    relation: &Relation,
    json: &Json,
    path: &str,
) -> Result<NestedUpdateManyItem> {
    let map = as_object(json, path)?;
    check_keys(map, &["where", "data"], path)?;

    let data = scalar_data(
        schema,
        &relation.related_table,
        map.get("data")
            .ok_or_else(|| Error::invalid_argument(format!("{path}.data: required")))?,
        &join(path, "data"),
    )?;
    if data.is_empty() {
        return Err(Error::invalid_argument(format!(
            "{path}.data: at least one field required"
        )));
    }

    Ok(NestedUpdateManyItem {
        r#where: match map.get("where") {
            None | Some(Json::Null) => None,
            Some(w) => opt_filter(schema, &relation.related_table, Some(w), &join(path, "where"))?,
        },
        data,
    })
}

/// A data object that may not contain nested relation operations; used by
/// the `*Many` mutations.
fn scalar_data(
    schema: &Schema,
    table: &str,
    json: &Json,
    path: &str,
) -> Result<IndexMap<String, Value>> {
    let map = as_object(json, path)?;
    let desc = schema.table(table)?;
    let mut data = IndexMap::new();

    for (key, value) in map {
        let kpath = join(path, key);
        if desc.relation_for_field(key).is_some() {
            return Err(Error::invalid_argument(format!(
                "{kpath}: nested relations are not supported here"
            )));
        }
        let field = desc
            .field(key)
            .ok_or_else(|| unknown_field(&kpath, table))?;
        data.insert(key.clone(), transform::to_db_value(field, value, &kpath)?);
    }

    Ok(data)
}

fn opt_select(
    schema: &Schema,
    table: &str,
    json: Option<&Json>,
    path: &str,
    count: CountMode,
) -> Result<Option<Select>> {
    let json = match json {
        None | Some(Json::Null) => return Ok(None),
        Some(json) => json,
    };

    let map = as_object(json, path)?;
    let desc = schema.table(table)?;
    let mut fields = vec![];

    for (key, value) in map {
        let kpath = join(path, key);
        if key == "_count" {
            match count {
                CountMode::Strip => continue,
                CountMode::Reject => {
                    return Err(Error::unsupported(format!(
                        "{kpath}: `_count` aggregation is not supported"
                    )))
                }
            }
        }

        if desc.field(key).is_none() {
            return Err(unknown_field(&kpath, table));
        }
        let on = value
            .as_bool()
            .ok_or_else(|| Error::invalid_argument(format!("{kpath}: expected a boolean")))?;
        if on {
            fields.push(key.clone());
        }
    }

    if fields.is_empty() {
        return Err(Error::invalid_argument(format!(
            "{path}: at least one field must be selected"
        )));
    }

    Ok(Some(Select { fields }))
}

fn opt_include(
    schema: &Schema,
    table: &str,
    json: Option<&Json>,
    path: &str,
    count: CountMode,
) -> Result<Option<Include>> {
    let json = match json {
        None | Some(Json::Null) => return Ok(None),
        Some(json) => json,
    };

    let map = as_object(json, path)?;
    let desc = schema.table(table)?;
    let mut entries = IndexMap::new();

    for (key, value) in map {
        let kpath = join(path, key);
        if key == "_count" {
            match count {
                CountMode::Strip => continue,
                CountMode::Reject => {
                    return Err(Error::unsupported(format!(
                        "{kpath}: `_count` aggregation is not supported"
                    )))
                }
            }
        }

        let relation = desc.relation_for_field(key).ok_or_else(|| {
            Error::invalid_argument(format!(
                "{kpath}: `{key}` does not name a relation on `{table}`"
            ))
        })?;

        let arg = match value {
            Json::Bool(true) => IncludeArg::All,
            Json::Bool(false) => IncludeArg::Skip,
            Json::Object(_) => IncludeArg::Nested(Box::new(find_args(
                schema,
                &relation.related_table,
                value,
                &kpath,
                count,
            )?)),
            _ => {
                return Err(Error::invalid_argument(format!(
                    "{kpath}: expected `true`, `false`, or a nested query"
                )))
            }
        };
        entries.insert(key.clone(), arg);
    }

    Ok(Some(Include { entries }))
}

fn order_by(
    schema: &Schema,
    table: &str,
    json: Option<&Json>,
    path: &str,
) -> Result<Vec<OrderBy>> {
    let json = match json {
        None | Some(Json::Null) => return Ok(vec![]),
        Some(json) => json,
    };

    let mut orders = vec![];
    match json {
        Json::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                order_by_entry(schema, table, item, &format!("{path}[{i}]"), &mut orders)?;
            }
        }
        other => order_by_entry(schema, table, other, path, &mut orders)?,
    }
    Ok(orders)
}

fn order_by_entry(
    schema: &Schema,
    table: &str,
    json: &Json,
    path: &str,
    orders: &mut Vec<OrderBy>,
) -> Result<()> {
    let map = as_object(json, path)?;
    let desc = schema.table(table)?;

    for (key, value) in map {
        let kpath = join(path, key);
        if desc.field(key).is_none() {
            return Err(unknown_field(&kpath, table));
        }
        let descending = match value.as_str() {
            Some("asc") => false,
            Some("desc") => true,
            _ => {
                return Err(Error::invalid_argument(format!(
                    "{kpath}: expected \"asc\" or \"desc\""
                )))
            }
        };
        orders.push(OrderBy {
            field: key.clone(),
            descending,
        });
    }
    Ok(())
}

fn non_negative(json: Option<&Json>, path: &str) -> Result<Option<u64>> {
    match json {
        None | Some(Json::Null) => Ok(None),
        Some(json) => json
            .as_u64()
            .map(Some)
            .ok_or_else(|| {
                Error::invalid_argument(format!("{path}: expected a non-negative integer"))
            }),
    }
}

fn input_object(json: &Json) -> Result<&JsonMap> {
    json.as_object()
        .ok_or_else(|| Error::invalid_argument("expected an object describing the operation"))
}

fn as_object<'a>(json: &'a Json, path: &str) -> Result<&'a JsonMap> {
    json.as_object()
        .ok_or_else(|| Error::invalid_argument(format!("{path}: expected an object")))
}

fn required<'a>(map: &'a JsonMap, key: &str) -> Result<&'a Json> {
    map.get(key)
        .ok_or_else(|| Error::invalid_argument(format!("{key}: required argument missing")))
}

fn check_keys(map: &JsonMap, allowed: &[&str], path: &str) -> Result<()> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(Error::invalid_argument(format!(
                "{}: unexpected argument",
                join(path, key)
            )));
        }
    }
    Ok(())
}

fn unknown_field(path: &str, table: &str) -> Error {
    Error::invalid_argument(format!("{path}: unknown field on table `{table}`"))
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
