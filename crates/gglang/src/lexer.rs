//! Lexer for GGLang source code, built on a logos-generated token machine.

use std::ops::Range;

use logos::Logos;

use crate::parse::ParseError;

/// Token kinds. Longest-match keeps `-->` and `~~>` ahead of the single-char
/// operators, and `i"..."` ahead of a bare `i` identifier.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub(crate) enum Token {
    #[token("var")]
    Var,
    #[token("const")]
    Const,
    #[token("fn")]
    Fn,
    #[token("class")]
    Class,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("return")]
    Return,
    #[token("super")]
    Super,
    #[token("ref")]
    Ref,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Name,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    Float,
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,
    #[regex(r#"i"([^"\\\n]|\\.)*""#)]
    InterpStr,

    #[token("-->")]
    PipeArrow,
    #[token("~~>")]
    CoercePipeArrow,
    #[token("|>")]
    AssignPipe,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token(">=")]
    GreaterEq,
    #[token("<=")]
    LessEq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("=")]
    Assign,
    #[token(">")]
    Greater,
    #[token("<")]
    Less,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("×")]
    Cross,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("&")]
    Amp,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
}

/// A token with its source slice and byte span.
#[derive(Debug, Clone)]
pub(crate) struct SpannedToken<'a> {
    pub token: Token,
    pub text: &'a str,
    pub span: Range<usize>,
}

/// Tokenizes the whole source up front. The parser works over the resulting
/// slice with arbitrary lookahead.
pub(crate) fn lex(source: &str) -> Result<Vec<SpannedToken<'_>>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push(SpannedToken {
                token,
                text: lexer.slice(),
                span,
            }),
            Err(()) => {
                return Err(ParseError::UnrecognizedToken {
                    line: line_of(source, span.start),
                    text: lexer.slice().to_owned(),
                });
            }
        }
    }
    Ok(tokens)
}

/// 1-based line number of a byte offset.
pub(crate) fn line_of(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|b| *b == b'\n')
        .count()
        + 1
}

/// Resolves the common backslash escapes inside a string literal body.
/// Unknown escapes keep the backslash, matching a permissive reading of the
/// grammar.
pub(crate) fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('0') => out.push('\0'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
