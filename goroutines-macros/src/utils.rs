use proc_macro::{TokenStream, TokenTree};

/// Splits a `TokenStream` on top-level commas.
///
/// Commas inside groups (`(..)`, `[..]`, `{..}`) are part of a single
/// token tree and never split. Empty arguments are skipped.
pub(crate) fn split_args(input: TokenStream) -> Vec<Vec<TokenTree>> {
    let mut args = Vec::new();
    let mut current = Vec::new();

    for token in input {
        match &token {
            TokenTree::Punct(p) if p.as_char() == ',' => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Renders tokens back to source, keeping adjacent identifiers apart.
pub(crate) fn tokens_to_string(tokens: &[TokenTree]) -> String {
    let mut out = String::new();
    let mut prev_was_ident = false;

    for t in tokens {
        let is_ident = matches!(t, TokenTree::Ident(_));

        if prev_was_ident && is_ident {
            out.push(' ');
        }

        out.push_str(&t.to_string());
        prev_was_ident = is_ident;
    }

    out
}

/// Returns `true` if the tokens at `i` form `=>`.
fn is_arrow(tokens: &[TokenTree], i: usize) -> bool {
    matches!(
        (tokens.get(i), tokens.get(i + 1)),
        (Some(TokenTree::Punct(p1)), Some(TokenTree::Punct(p2)))
            if p1.as_char() == '=' && p2.as_char() == '>'
    )
}

/// Parses `channel => handler` branches separated by commas.
///
/// A handler containing top-level commas must be wrapped in braces or
/// parentheses. Branches missing either side are ignored.
pub(crate) fn parse_select_branches(input: TokenStream) -> Vec<(String, String)> {
    let mut branches = Vec::new();

    for tokens in split_args(input) {
        let Some(arrow) = (0..tokens.len()).find(|&i| is_arrow(&tokens, i)) else {
            continue;
        };

        let channel = tokens_to_string(&tokens[..arrow]);
        let handler = tokens_to_string(&tokens[arrow + 2..]);

        if !channel.trim().is_empty() && !handler.trim().is_empty() {
            branches.push((channel, handler));
        }
    }

    branches
}

/// Builds the `RuntimeBuilder` expression for `#[main]`/`#[test]`
/// arguments such as `worker_threads = 2, thread_name = "io"`.
pub(crate) fn runtime_builder(attr: &str) -> Result<String, String> {
    let mut builder = String::from("::goroutines::RuntimeBuilder::new()");

    for part in attr.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, value)) = part.split_once('=') else {
            return Err(format!("expected `key = value`, found `{part}`"));
        };

        let value = value.trim();
        match key.trim() {
            "worker_threads" => {
                let n = value
                    .parse::<usize>()
                    .map_err(|_| format!("worker_threads must be an integer, found `{value}`"))?;
                builder.push_str(&format!(".worker_threads({n})"));
            }
            "thread_name" => builder.push_str(&format!(".thread_name({value})")),
            other => return Err(format!("unknown runtime option `{other}`")),
        }
    }

    builder.push_str(".build()");
    Ok(builder)
}

/// Parses generated source, or reports why it did not parse.
pub(crate) fn parse_or_error(name: &str, source: &str) -> TokenStream {
    source
        .parse()
        .unwrap_or_else(|err| compile_error(&format!("{name} macro error: {err}")))
}

pub(crate) fn compile_error(msg: &str) -> TokenStream {
    format!("compile_error!({msg:?});")
        .parse()
        .unwrap_or_default()
}
