/// Builds the `files.list` filter: `'<parent>' in parents and trashed=false`, narrowed by
/// `name='<name>'` when given. Single quotes and backslashes in either value are escaped.
pub fn list_query(parent: Option<&str>, name: Option<&str>) -> String {
    let mut clauses = Vec::with_capacity(3);

    if let Some(parent) = parent {
        clauses.push(format!("'{}' in parents", escape(parent)));
        clauses.push(String::from("trashed=false"));
    }

    if let Some(name) = name {
        clauses.push(format!("name='{}'", escape(name)));
    }

    clauses.join(" and ")
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
