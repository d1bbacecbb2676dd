use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::{AdoptionRequestStatus, PetGender, PetSize, PetSpecies, PetStatus, Role};

/// A bindable SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Uuid(Uuid),
    Text(String),
    Int(i32),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Role(Role),
    Species(PetSpecies),
    Gender(PetGender),
    Size(PetSize),
    PetStatus(PetStatus),
    AdoptionStatus(AdoptionRequestStatus),
}

impl Value {
    fn bind(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self.clone() {
            Value::Uuid(v) => qb.push_bind(v),
            Value::Text(v) => qb.push_bind(v),
            Value::Int(v) => qb.push_bind(v),
            Value::Bool(v) => qb.push_bind(v),
            Value::Timestamp(v) => qb.push_bind(v),
            Value::Role(v) => qb.push_bind(v),
            Value::Species(v) => qb.push_bind(v),
            Value::Gender(v) => qb.push_bind(v),
            Value::Size(v) => qb.push_bind(v),
            Value::PetStatus(v) => qb.push_bind(v),
            Value::AdoptionStatus(v) => qb.push_bind(v),
        };
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        })*
    };
}

value_from! {
    Uuid => Uuid,
    String => Text,
    i32 => Int,
    bool => Bool,
    DateTime<Utc> => Timestamp,
    Role => Role,
    PetSpecies => Species,
    PetGender => Gender,
    PetSize => Size,
    PetStatus => PetStatus,
    AdoptionRequestStatus => AdoptionStatus,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Eq(&'static str, Value),
    EqIgnoreCase(&'static str, String),
    Contains(&'static str, String),
    Gte(&'static str, Value),
    Lte(&'static str, Value),
    InSubquery {
        column: &'static str,
        subquery: &'static str,
        value: Value,
    },
}

/// AND-ed WHERE conditions over a single table.
///
/// Column names are always compile-time constants; only values are bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    conditions: Vec<Condition>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(column, value.into()));
        self
    }

    pub fn eq_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    pub fn eq_ignore_case(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::EqIgnoreCase(column, value.into()));
        self
    }

    pub fn eq_ignore_case_opt(self, column: &'static str, value: Option<String>) -> Self {
        match value {
            Some(v) => self.eq_ignore_case(column, v),
            None => self,
        }
    }

    /// Case-insensitive substring match.
    pub fn contains_opt(mut self, column: &'static str, value: Option<String>) -> Self {
        if let Some(v) = value {
            self.conditions.push(Condition::Contains(column, v));
        }
        self
    }

    pub fn gte_opt<V: Into<Value>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.conditions.push(Condition::Gte(column, v.into()));
        }
        self
    }

    pub fn lte_opt<V: Into<Value>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.conditions.push(Condition::Lte(column, v.into()));
        }
        self
    }

    /// `column IN (<subquery> $value)`; the subquery must end where the bound value goes.
    pub fn in_subquery_opt<V: Into<Value>>(
        mut self,
        column: &'static str,
        subquery: &'static str,
        value: Option<V>,
    ) -> Self {
        if let Some(v) = value {
            self.conditions.push(Condition::InSubquery {
                column,
                subquery,
                value: v.into(),
            });
        }
        self
    }

    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (i, condition) in self.conditions.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            match condition {
                Condition::Eq(column, value) => {
                    qb.push(*column).push(" = ");
                    value.bind(qb);
                }
                Condition::EqIgnoreCase(column, value) => {
                    qb.push("LOWER(").push(*column).push(") = LOWER(");
                    qb.push_bind(value.clone());
                    qb.push(")");
                }
                Condition::Contains(column, value) => {
                    qb.push(*column).push(" ILIKE ");
                    qb.push_bind(format!("%{}%", escape_like(value)));
                }
                Condition::Gte(column, value) => {
                    qb.push(*column).push(" >= ");
                    value.bind(qb);
                }
                Condition::Lte(column, value) => {
                    qb.push(*column).push(" <= ");
                    value.bind(qb);
                }
                Condition::InSubquery { column, subquery, value } => {
                    qb.push(*column).push(" IN (").push(*subquery);
                    value.bind(qb);
                    qb.push(")");
                }
            }
        }
    }
}

/// Escape LIKE wildcards so user input matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(criteria: &Criteria) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM pets");
        criteria.push_where(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn empty_criteria_adds_no_where_clause() {
        assert_eq!(render(&Criteria::new()), "SELECT * FROM pets");
    }

    #[test]
    fn conditions_are_joined_with_and_and_bound() {
        let criteria = Criteria::new()
            .eq("status", PetStatus::Available)
            .eq_opt::<PetSize>("size", None)
            .contains_opt("name", Some("rex".to_string()))
            .gte_opt("age", Some(2));

        assert_eq!(
            render(&criteria),
            "SELECT * FROM pets WHERE status = $1 AND name ILIKE $2 AND age >= $3"
        );
    }

    #[test]
    fn subquery_condition_binds_inside_parentheses() {
        let criteria = Criteria::new().in_subquery_opt(
            "pet_id",
            "SELECT id FROM pets WHERE foundation_id = ",
            Some(Uuid::nil()),
        );
        assert_eq!(
            render(&criteria),
            "SELECT * FROM pets WHERE pet_id IN (SELECT id FROM pets WHERE foundation_id = $1)"
        );
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
