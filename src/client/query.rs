//! Request options and query-string helpers shared by the endpoints.

// self
use crate::{_prelude::*, error::ConfigError};

/// Largest `limit` the API accepts.
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Options for list endpoints supporting sparse fieldsets and page sizes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListOptions {
	/// Attribute names for the `fields[<type>]` parameter; blanks are ignored.
	pub fields: Vec<String>,
	/// Page size; `None` or `0` lets the server decide.
	pub limit: Option<u32>,
}
impl ListOptions {
	/// Restricts the returned attributes.
	pub fn fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fields = fields.into_iter().map(Into::into).collect();

		self
	}

	/// Sets the page size.
	pub fn limit(mut self, limit: u32) -> Self {
		self.limit = Some(limit);

		self
	}
}

/// Options for single-resource endpoints supporting sparse fieldsets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldsOptions {
	/// Attribute names for the `fields[<type>]` parameter; blanks are ignored.
	pub fields: Vec<String>,
}
impl FieldsOptions {
	/// Restricts the returned attributes.
	pub fn fields<I, S>(fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { fields: fields.into_iter().map(Into::into).collect() }
	}
}

/// Ordered query parameters for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Query(Vec<(String, String)>);
impl Query {
	/// Adds `fields[<kind>]`, joining trimmed non-empty names with commas.
	pub(crate) fn fields(mut self, kind: &'static str, fields: &[String]) -> Self {
		let joined = fields
			.iter()
			.map(|field| field.trim())
			.filter(|field| !field.is_empty())
			.collect::<Vec<_>>()
			.join(",");

		if !joined.is_empty() {
			self.0.push((format!("fields[{kind}]"), joined));
		}

		self
	}

	/// Adds `limit`, omitting zero and rejecting values above [`MAX_PAGE_LIMIT`].
	pub(crate) fn limit(mut self, limit: Option<u32>) -> Result<Self> {
		match limit {
			None | Some(0) => Ok(self),
			Some(limit) if limit > MAX_PAGE_LIMIT =>
				Err(ConfigError::LimitOutOfRange { limit, max: MAX_PAGE_LIMIT }.into()),
			Some(limit) => {
				self.0.push(("limit".into(), limit.to_string()));

				Ok(self)
			},
		}
	}

	/// Writes the parameters onto `url`, leaving it untouched when there are none.
	pub(crate) fn apply(&self, url: &mut Url) {
		if self.0.is_empty() {
			return;
		}

		let mut pairs = url.query_pairs_mut();

		for (key, value) in &self.0 {
			pairs.append_pair(key, value);
		}
	}
}

/// Trims a path identifier and rejects blanks. Percent-encoding happens when the segment is
/// pushed onto the URL.
pub(crate) fn require_id<'a>(name: &'static str, id: &'a str) -> Result<&'a str> {
	let id = id.trim();

	if id.is_empty() {
		return Err(ConfigError::MissingId { name }.into());
	}

	Ok(id)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn render(query: &Query) -> String {
		let mut url =
			Url::parse("https://api.test/v1/orgDevices").expect("URL fixture should parse.");

		query.apply(&mut url);

		url.query().unwrap_or_default().to_owned()
	}

	#[test]
	fn fields_are_trimmed_filtered_and_joined() {
		let fields = vec![" partNumber ".to_owned(), "".into(), "  ".into(), "serialNumber".into()];
		let query = Query::default().fields("orgDevices", &fields);

		assert_eq!(render(&query), "fields%5BorgDevices%5D=partNumber%2CserialNumber");
		assert_eq!(render(&Query::default().fields("orgDevices", &[" ".into()])), "");
	}

	#[test]
	fn limit_bounds_are_enforced() {
		assert_eq!(render(&Query::default().limit(None).expect("No limit is valid.")), "");
		assert_eq!(render(&Query::default().limit(Some(0)).expect("Zero is omitted.")), "");
		let query = Query::default().limit(Some(1000)).expect("1000 is the maximum.");

		assert_eq!(render(&query), "limit=1000");

		let err = Query::default().limit(Some(1001)).expect_err("1001 exceeds the maximum.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::LimitOutOfRange { limit: 1001, max: MAX_PAGE_LIMIT })
		));
	}

	#[test]
	fn ids_are_trimmed_and_required() {
		let id = require_id("org device ID", "  SERIAL1 ").expect("Padded IDs are trimmed.");

		assert_eq!(id, "SERIAL1");

		let err = require_id("org device ID", " \t").expect_err("Blank IDs are rejected.");

		assert_eq!(err.to_string(), "The org device ID is required.");
	}

	#[test]
	fn option_builders_collect_fields() {
		let options = ListOptions::default().fields(["serverName"]).limit(5);

		assert_eq!(options.fields, vec!["serverName".to_owned()]);
		assert_eq!(options.limit, Some(5));
		assert_eq!(FieldsOptions::fields(["status"]).fields, vec!["status".to_owned()]);
	}
}
