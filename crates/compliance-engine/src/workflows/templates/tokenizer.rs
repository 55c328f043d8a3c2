//! Single-pass tokenizer for template markup and the block tree built on top of it.
//!
//! Blocks are matched with an explicit stack of open tags. Properly nested
//! blocks are supported. A close tag that matches a deeper open tag closes
//! that block and leaves every block opened after it unclosed. Unclosed open
//! tags and orphan close tags are kept as literal text.
//!
//! A block tag alone on its line owns the trailing newline, so removing a
//! block does not leave a blank line behind.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Text(&'a str),
    Placeholder {
        raw: &'a str,
        name: &'a str,
    },
    Open {
        raw: &'a str,
        tag: &'a str,
        condition: &'a str,
        negated: bool,
    },
    Close {
        raw: &'a str,
        tag: &'a str,
    },
    Statement {
        raw: &'a str,
        kind: &'a str,
        args: Vec<&'a str>,
    },
}

impl<'a> Token<'a> {
    pub(crate) fn raw(&self) -> &'a str {
        match self {
            Token::Text(raw)
            | Token::Placeholder { raw, .. }
            | Token::Open { raw, .. }
            | Token::Close { raw, .. }
            | Token::Statement { raw, .. } => raw,
        }
    }
}

pub(crate) fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        let Some(start) = rest.find("{{") else {
            tokens.push(Token::Text(rest));
            break;
        };
        if start > 0 {
            tokens.push(Token::Text(&rest[..start]));
        }

        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            tokens.push(Token::Text(&rest[start..]));
            break;
        };

        let inner = &after[..end];
        if inner.contains("{{") {
            // "{{ ... {{Name}}": the first braces are prose.
            tokens.push(Token::Text(&rest[start..start + 2]));
            rest = after;
            continue;
        }

        let mut len = 2 + end + 2;
        let offset = input.len() - rest.len() + start;
        let line_start = offset == 0 || input[..offset].ends_with('\n');
        if line_start && is_block_tag(inner) && after[end + 2..].starts_with('\n') {
            len += 1;
        }

        tokens.push(classify(&rest[start..start + len], inner));
        rest = &rest[start + len..];
    }

    tokens
}

fn is_block_tag(inner: &str) -> bool {
    let trimmed = inner.trim();
    (trimmed.starts_with("#IF_") && !trimmed.contains(':')) || trimmed.starts_with("/IF_")
}

fn classify<'a>(raw: &'a str, inner: &'a str) -> Token<'a> {
    let trimmed = inner.trim();

    if let Some(body) = trimmed.strip_prefix('#') {
        if body.starts_with("IF_") && !body.contains(':') {
            let (condition, negated) = match body.strip_prefix("IF_NOT_") {
                Some(condition) => (condition, true),
                None => (&body[3..], false),
            };
            return Token::Open {
                raw,
                tag: body,
                condition,
                negated,
            };
        }
        if let Some((kind, args)) = body.split_once(':') {
            return Token::Statement {
                raw,
                kind: kind.trim(),
                args: args.split(':').map(str::trim).collect(),
            };
        }
        return Token::Text(raw);
    }

    if let Some(body) = trimmed.strip_prefix('/') {
        if body.starts_with("IF_") {
            return Token::Close { raw, tag: body };
        }
        return Token::Text(raw);
    }

    if trimmed.is_empty() {
        Token::Text(raw)
    } else {
        Token::Placeholder { raw, name: trimmed }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node<'a> {
    Token(Token<'a>),
    Block(Block<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block<'a> {
    pub open: &'a str,
    pub close: &'a str,
    pub condition: &'a str,
    pub negated: bool,
    pub children: Vec<Node<'a>>,
}

struct Frame<'a> {
    open: Token<'a>,
    tag: &'a str,
    children: Vec<Node<'a>>,
}

impl<'a> Frame<'a> {
    fn into_literal(self) -> Vec<Node<'a>> {
        let mut nodes = Vec::with_capacity(self.children.len() + 1);
        nodes.push(Node::Token(self.open));
        nodes.extend(self.children);
        nodes
    }
}

fn current<'s, 'a>(
    stack: &'s mut [Frame<'a>],
    root: &'s mut Vec<Node<'a>>,
) -> &'s mut Vec<Node<'a>> {
    match stack.last_mut() {
        Some(frame) => &mut frame.children,
        None => root,
    }
}

pub(crate) fn parse(input: &str) -> Vec<Node<'_>> {
    let mut root = Vec::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();

    for token in tokenize(input) {
        match token {
            Token::Open { tag, .. } => stack.push(Frame {
                tag,
                open: token,
                children: Vec::new(),
            }),
            Token::Close { raw, tag } => {
                let Some(depth) = stack.iter().rposition(|frame| frame.tag == tag) else {
                    current(&mut stack, &mut root).push(Node::Token(token));
                    continue;
                };

                while stack.len() > depth + 1 {
                    if let Some(unclosed) = stack.pop() {
                        current(&mut stack, &mut root).extend(unclosed.into_literal());
                    }
                }

                if let Some(Frame {
                    open:
                        Token::Open {
                            raw: open,
                            condition,
                            negated,
                            ..
                        },
                    children,
                    ..
                }) = stack.pop()
                {
                    let block = Block {
                        open,
                        close: raw,
                        condition,
                        negated,
                        children,
                    };
                    current(&mut stack, &mut root).push(Node::Block(block));
                }
            }
            other => current(&mut stack, &mut root).push(Node::Token(other)),
        }
    }

    while let Some(unclosed) = stack.pop() {
        current(&mut stack, &mut root).extend(unclosed.into_literal());
    }

    root
}
