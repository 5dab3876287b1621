use std::collections::BTreeSet;
use std::fmt;

use crate::binder::{Binder, BoundValue, PlaceholderStyle};
use crate::error::{ComposeError, Error};
use crate::identifier::Identifier;
use crate::kind::{Field, Object, Sort};
use crate::value::Value;

/// Comparison operator in a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `LIKE`
    Like,
}

impl Comparison {
    /// The operator as written in the template.
    pub fn as_str(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::NotEq => "!=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Like => "LIKE",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `field <op> placeholder`, with the value bound out of band.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    field: Identifier<Field>,
    op: Comparison,
    value: BoundValue,
}

impl Condition {
    /// Creates a condition on a trusted field.
    pub fn new(field: Identifier<Field>, op: Comparison, value: BoundValue) -> Self {
        Self { field, op, value }
    }

    /// The field being compared.
    pub fn field(&self) -> &Identifier<Field> {
        &self.field
    }

    /// The comparison operator.
    pub fn op(&self) -> Comparison {
        self.op
    }

    /// The bound right-hand side.
    pub fn value(&self) -> &BoundValue {
        &self.value
    }
}

/// Sort clause: a trusted field and a trusted direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    field: Identifier<Field>,
    direction: Identifier<Sort>,
}

impl OrderBy {
    /// Creates a sort clause.
    pub fn new(field: Identifier<Field>, direction: Identifier<Sort>) -> Self {
        Self { field, direction }
    }

    /// The sort field.
    pub fn field(&self) -> &Identifier<Field> {
        &self.field
    }

    /// The sort direction.
    pub fn direction(&self) -> &Identifier<Sort> {
        &self.direction
    }
}

/// Query text assembled only from trusted identifiers, fixed keywords and
/// placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryTemplate {
    text: String,
}

impl QueryTemplate {
    /// The template text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the template and returns its text.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl AsRef<str> for QueryTemplate {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for QueryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// What is handed to the execution collaborator: the template plus its
/// parameters in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    template: QueryTemplate,
    params: Vec<BoundValue>,
}

impl Query {
    /// The template.
    pub fn template(&self) -> &QueryTemplate {
        &self.template
    }

    /// Bound parameters in the order their placeholders appear.
    pub fn params(&self) -> &[BoundValue] {
        &self.params
    }

    /// Looks a parameter up by name or token.
    ///
    /// Names match the number in the token: `p0` is `:p0`, `p1` is `$1`.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|p| p.name() == name || p.placeholder() == name)
            .map(BoundValue::value)
    }

    /// Splits into template and parameters.
    pub fn into_parts(self) -> (QueryTemplate, Vec<BoundValue>) {
        (self.template, self.params)
    }
}

/// Assembles a query template from trusted parts.
///
/// Identifiers are typed, so a raw string cannot be passed in. What remains
/// to check at runtime is that the parts belong together: every field must
/// have been validated against `object`, and no two values may share a
/// placeholder.
///
/// An empty `fields` slice selects `*`. Output is deterministic: the same
/// arguments always produce the same bytes.
///
/// # Errors
///
/// - [`ComposeError::ForeignField`] if a field belongs to another object
/// - [`ComposeError::DuplicatePlaceholder`] if two conditions carry the same
///   placeholder
pub fn compose(
    object: &Identifier<Object>,
    fields: &[Identifier<Field>],
    conditions: &[Condition],
    order: Option<&OrderBy>,
    limit: Option<u32>,
) -> Result<QueryTemplate, ComposeError> {
    let referenced = fields
        .iter()
        .chain(conditions.iter().map(Condition::field))
        .chain(order.map(OrderBy::field));
    for field in referenced {
        if field.object() != object.name() {
            return Err(ComposeError::ForeignField {
                field: field.name().to_string(),
                owner: field.object().to_string(),
                object: object.name().to_string(),
            });
        }
    }

    let mut seen = BTreeSet::new();
    for condition in conditions {
        let placeholder = condition.value.placeholder();
        if !seen.insert(placeholder) {
            return Err(ComposeError::DuplicatePlaceholder {
                placeholder: placeholder.to_string(),
            });
        }
    }

    let mut text = String::from("SELECT ");
    if fields.is_empty() {
        text.push('*');
    } else {
        let names: Vec<&str> = fields.iter().map(Identifier::name).collect();
        text.push_str(&names.join(", "));
    }
    text.push_str(" FROM ");
    text.push_str(object.name());

    for (i, condition) in conditions.iter().enumerate() {
        text.push_str(if i == 0 { " WHERE " } else { " AND " });
        text.push_str(condition.field.name());
        text.push(' ');
        text.push_str(condition.op.as_str());
        text.push(' ');
        text.push_str(condition.value.placeholder());
    }

    if let Some(order) = order {
        text.push_str(" ORDER BY ");
        text.push_str(order.field.name());
        text.push(' ');
        text.push_str(order.direction.name());
    }

    if let Some(limit) = limit {
        text.push_str(" LIMIT ");
        text.push_str(&limit.to_string());
    }

    tracing::debug!(template = %text, params = conditions.len(), "query template composed");
    Ok(QueryTemplate { text })
}

/// Builds a [`Query`] from validated identifiers, binding values as it goes.
///
/// # Examples
///
/// ```
/// use query_guard::{Comparison, QueryBuilder, Registry, Validator};
///
/// let registry = Registry::builder()
///     .object("Account", ["Id", "Name", "Industry"])
///     .build();
/// let validator = Validator::new(&registry);
///
/// let account = validator.object("Account")?;
/// let id = validator.field(&account, "Id")?;
/// let name = validator.field(&account, "Name")?;
/// let desc = validator.sort("desc")?;
///
/// let query = QueryBuilder::new(&account)
///     .select(&id)
///     .select(&name)
///     .filter(&name, Comparison::Eq, "O'Reilly Company")
///     .order_by(&name, &desc)
///     .limit(10)
///     .build()?;
///
/// assert_eq!(
///     query.template().as_str(),
///     "SELECT Id, Name FROM Account WHERE Name = :p0 ORDER BY Name DESC LIMIT 10"
/// );
/// assert_eq!(query.param("p0").and_then(|v| v.as_text()), Some("O'Reilly Company"));
/// # Ok::<(), query_guard::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    object: Identifier<Object>,
    fields: Vec<Identifier<Field>>,
    conditions: Vec<Condition>,
    order: Option<OrderBy>,
    limit: Option<u32>,
    binder: Binder,
}

impl QueryBuilder {
    /// Starts a query on `object` with named placeholders.
    pub fn new(object: &Identifier<Object>) -> Self {
        Self::with_style(object, PlaceholderStyle::default())
    }

    /// Starts a query on `object` with the given placeholder style.
    pub fn with_style(object: &Identifier<Object>, style: PlaceholderStyle) -> Self {
        Self {
            object: object.clone(),
            fields: Vec::new(),
            conditions: Vec::new(),
            order: None,
            limit: None,
            binder: Binder::new(style),
        }
    }

    /// Adds a field to the projection.
    pub fn select(mut self, field: &Identifier<Field>) -> Self {
        self.fields.push(field.clone());
        self
    }

    /// Adds a condition, binding `value` to a fresh placeholder.
    pub fn filter(
        mut self,
        field: &Identifier<Field>,
        op: Comparison,
        value: impl Into<Value>,
    ) -> Self {
        let bound = self.binder.bind(value);
        self.conditions.push(Condition::new(field.clone(), op, bound));
        self
    }

    /// Sets the sort clause, replacing any earlier one.
    pub fn order_by(mut self, field: &Identifier<Field>, direction: &Identifier<Sort>) -> Self {
        self.order = Some(OrderBy::new(field.clone(), direction.clone()));
        self
    }

    /// Caps the number of rows.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Composes the template and collects the parameters.
    ///
    /// # Errors
    ///
    /// See [`compose`].
    pub fn build(self) -> Result<Query, Error> {
        let template = compose(
            &self.object,
            &self.fields,
            &self.conditions,
            self.order.as_ref(),
            self.limit,
        )?;
        let params = self.conditions.into_iter().map(|c| c.value).collect();
        Ok(Query { template, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{field_ident, object_ident, SortDirection};

    #[test]
    fn select_star_when_no_fields() {
        let template = compose(&object_ident("Account"), &[], &[], None, None).unwrap();
        assert_eq!(template.as_str(), "SELECT * FROM Account");
    }

    #[test]
    fn full_template_shape() {
        let account = object_ident("Account");
        let name = field_ident("Account", "Name");
        let industry = field_ident("Account", "Industry");
        let mut binder = Binder::default();

        let conditions = [
            Condition::new(name.clone(), Comparison::Like, binder.bind("%Acme%")),
            Condition::new(industry.clone(), Comparison::NotEq, binder.bind("Retail")),
        ];
        let order = OrderBy::new(industry.clone(), SortDirection::Desc.into());

        let template = compose(
            &account,
            &[name, industry],
            &conditions,
            Some(&order),
            Some(25),
        )
        .unwrap();

        assert_eq!(
            template.to_string(),
            "SELECT Name, Industry FROM Account WHERE Name LIKE :p0 AND Industry != :p1 \
             ORDER BY Industry DESC LIMIT 25"
        );
    }

    #[test]
    fn values_never_appear_in_template() {
        let account = object_ident("Account");
        let name = field_ident("Account", "Name");

        let query = QueryBuilder::new(&account)
            .select(&name)
            .filter(&name, Comparison::Eq, "O'Reilly Company")
            .build()
            .unwrap();

        assert!(!query.template().as_str().contains("O'Reilly"));
        assert!(query.template().as_str().contains(":p0"));
        assert_eq!(
            query.param(":p0"),
            Some(&Value::Text("O'Reilly Company".to_string()))
        );
    }

    #[test]
    fn foreign_field_is_refused() {
        let account = object_ident("Account");
        let last_name = field_ident("Contact", "LastName");

        let err = compose(&account, &[last_name], &[], None, None).unwrap_err();
        assert_eq!(
            err,
            ComposeError::ForeignField {
                field: "LastName".to_string(),
                owner: "Contact".to_string(),
                object: "Account".to_string(),
            }
        );
    }

    #[test]
    fn foreign_field_in_order_by_is_refused() {
        let account = object_ident("Account");
        let last_name = field_ident("Contact", "LastName");

        let result = QueryBuilder::new(&account)
            .order_by(&last_name, &SortDirection::Asc.into())
            .build();
        assert!(matches!(
            result,
            Err(Error::Compose(ComposeError::ForeignField { .. }))
        ));
    }

    #[test]
    fn values_from_two_binders_collide() {
        let account = object_ident("Account");
        let name = field_ident("Account", "Name");

        let a = Binder::default().bind("x");
        let b = Binder::default().bind("y");
        let conditions = [
            Condition::new(name.clone(), Comparison::Eq, a),
            Condition::new(name, Comparison::Eq, b),
        ];

        let err = compose(&account, &[], &conditions, None, None).unwrap_err();
        assert_eq!(
            err,
            ComposeError::DuplicatePlaceholder {
                placeholder: ":p0".to_string()
            }
        );
    }

    #[test]
    fn composition_is_deterministic() {
        let build = || {
            let account = object_ident("Account");
            let name = field_ident("Account", "Name");
            QueryBuilder::new(&account)
                .select(&name)
                .filter(&name, Comparison::Eq, "a")
                .filter(&name, Comparison::Eq, "a")
                .limit(5)
                .build()
                .unwrap()
        };

        assert_eq!(build(), build());
        assert_eq!(
            build().template().as_str(),
            "SELECT Name FROM Account WHERE Name = :p0 AND Name = :p1 LIMIT 5"
        );
    }

    #[test]
    fn numbered_style_and_parts() {
        let account = object_ident("Account");
        let name = field_ident("Account", "Name");

        let query = QueryBuilder::with_style(&account, PlaceholderStyle::Numbered)
            .filter(&name, Comparison::Ge, 10)
            .filter(&name, Comparison::Lt, None::<i64>)
            .build()
            .unwrap();

        assert_eq!(
            query.template().as_str(),
            "SELECT * FROM Account WHERE Name >= $1 AND Name < $2"
        );
        assert_eq!(query.param("p1"), Some(&Value::Int(10)));
        assert_eq!(query.param("$1"), query.param("p1"));
        assert_eq!(query.param("$2"), Some(&Value::Null));
        assert_eq!(query.param("p2"), query.param("$2"));
        assert_eq!(query.param("p0"), None);

        let (template, params) = query.into_parts();
        assert_eq!(
            template.into_string(),
            "SELECT * FROM Account WHERE Name >= $1 AND Name < $2"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn comparison_operators_render() {
        let ops = [
            (Comparison::Eq, "="),
            (Comparison::NotEq, "!="),
            (Comparison::Lt, "<"),
            (Comparison::Le, "<="),
            (Comparison::Gt, ">"),
            (Comparison::Ge, ">="),
            (Comparison::Like, "LIKE"),
        ];
        for (op, text) in ops {
            assert_eq!(op.to_string(), text);
        }
    }
}
