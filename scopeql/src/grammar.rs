use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "scopeql.pest"]
pub struct ScopeqlParser;
