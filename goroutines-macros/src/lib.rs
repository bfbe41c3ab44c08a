//! Procedural macros for `goroutines`.
//!
//! Re-exported by the `goroutines` crate; depend on that instead.

mod utils;

use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Waits on several channels and runs the handler of the first one to
/// deliver.
///
/// ```rust,ignore
/// let picked = select! {
///     numbers => |n: Option<i32>| format!("number {n:?}"),
///     words => |w: Option<String>| format!("word {w:?}"),
/// };
/// ```
///
/// Each branch is `channel => handler`. The handler receives `Some(value)`,
/// or `None` if that channel was closed while waiting. Expands to a
/// `Select` built with `case_ex` and awaited, so it evaluates to
/// `Option<R>`: `None` when every channel was already closed and drained.
#[proc_macro]
pub fn select(input: TokenStream) -> TokenStream {
    let branches = utils::parse_select_branches(input);

    let mut out = String::from("::goroutines::select::Select::new()");
    for (channel, handler) in &branches {
        out.push_str(&format!("\n.case_ex(&({channel}), {handler})"));
    }
    out.push_str("\n.await");

    utils::parse_or_error("select", &out)
}

/// Starts a goroutine calling an async function with arguments.
///
/// `go!(f, a, b)` expands to `::goroutines::go(f(a, b))`.
#[proc_macro]
pub fn go(input: TokenStream) -> TokenStream {
    let args = utils::split_args(input);

    let Some((function, args)) = args.split_first() else {
        return utils::compile_error("go! expects a function and its arguments");
    };

    let function = utils::tokens_to_string(function);
    let args = args
        .iter()
        .map(|arg| utils::tokens_to_string(arg))
        .collect::<Vec<_>>()
        .join(", ");

    utils::parse_or_error("go", &format!("::goroutines::go(({function})({args}))"))
}

/// Runs an `async fn main` on a goroutines runtime.
///
/// Accepts `worker_threads = N` and `thread_name = "..."`.
///
/// ```rust,ignore
/// #[goroutines::main(worker_threads = 2)]
/// async fn main() {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let builder = match utils::runtime_builder(&attr.to_string()) {
        Ok(builder) => builder,
        Err(msg) => return utils::compile_error(&msg),
    };

    let Some((tokens, block)) = wrap_body(item) else {
        return utils::compile_error("expected an async fn with a body");
    };

    let body = format!(
        "{{
            let runtime = {builder};
            runtime.block_on(async move {{ {block} }})
        }}"
    );

    finish(tokens, &body, None)
}

/// Runs an `async fn` test on a fresh goroutines runtime.
///
/// Accepts the same arguments as [`main`](macro@main).
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let builder = match utils::runtime_builder(&attr.to_string()) {
        Ok(builder) => builder,
        Err(msg) => return utils::compile_error(&msg),
    };

    let Some((tokens, block)) = wrap_body(item) else {
        return utils::compile_error("expected an async fn with a body");
    };

    let body = format!(
        "{{
            let runtime = {builder};
            runtime.block_on(async move {{ {block} }});
        }}"
    );

    finish(tokens, &body, Some("#[test]"))
}

/// Strips `async` from a function and returns its tokens with the body's
/// source. The body is the last brace group.
fn wrap_body(item: TokenStream) -> Option<(Vec<TokenTree>, String)> {
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    if let Some(pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    {
        tokens.remove(pos);
    }

    let block = match tokens.last() {
        Some(TokenTree::Group(g)) if g.delimiter() == Delimiter::Brace => g.stream().to_string(),
        _ => return None,
    };

    Some((tokens, block))
}

/// Replaces the function body and prepends `attribute`, if any.
fn finish(mut tokens: Vec<TokenTree>, body: &str, attribute: Option<&str>) -> TokenStream {
    let stream = match body.parse::<TokenStream>() {
        Ok(stream) => stream,
        Err(err) => return utils::compile_error(&format!("failed to expand body: {err}")),
    };

    if let Some(last) = tokens.last_mut() {
        *last = TokenTree::Group(Group::new(Delimiter::Brace, stream));
    }

    let mut result: Vec<TokenTree> = match attribute {
        Some(attribute) => attribute.parse::<TokenStream>().into_iter().flatten().collect(),
        None => Vec::new(),
    };
    result.extend(tokens);

    result.into_iter().collect()
}
