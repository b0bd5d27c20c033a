use lazy_static::lazy_static;
use regex::Regex;

use crate::{CodePosition, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind};

pub type RegexHandler = fn(&mut Lexer, &str);

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

/// Operator symbols, longest first so the alternation prefers them.
pub const OPERATOR_SYMBOLS: [&str; 43] = [
    "!==", "!=~", "===", "<=>", ">>>", "|||", "?::", "...", "**", "~/", "//", "^/", "+|", "-|",
    "::", "?:", "??", "==", "!=", "=~", "<=", ">=", "<<", ">>", "&&", "||", "~~", "->", "+", "-",
    "*", "/", "%", "&", "|", "^", "~", "!", "<", ">", "?", ":", "@",
];

lazy_static! {
    static ref PATTERNS: Vec<RegexPattern> = {
        let operators = OPERATOR_SYMBOLS
            .iter()
            .map(|symbol| regex::escape(symbol))
            .collect::<Vec<_>>()
            .join("|");

        vec![
            RegexPattern { regex: Regex::new("^\\r?\\n").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Eol) },
            RegexPattern { regex: Regex::new("^#[^\\n]*").unwrap(), handler: comment_handler },
            RegexPattern { regex: Regex::new("^\\\\\\r?\\n").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LineContinuation) },
            RegexPattern { regex: Regex::new("^\\\\.").unwrap(), handler: escape_sequence_handler },
            RegexPattern { regex: Regex::new("^\\{\\{\\{(?s:.*?)\\}\\}\\}").unwrap(), handler: multiline_text_handler },
            RegexPattern { regex: Regex::new("^\\{\\{\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LexerError) },
            RegexPattern { regex: Regex::new("^\"[^\"\\n]*\"").unwrap(), handler: text_quotes_handler },
            RegexPattern { regex: Regex::new("^\"[^\\n]*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LexerError) },
            RegexPattern { regex: Regex::new("^[ \\t]*,[ \\t]*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ArgumentSeparator) },
            RegexPattern {
                regex: Regex::new("^[ \\t]+(\\*\\*|\\*|~/|//|\\^/|/|%|\\+|-|<<|>>>|>>|&|\\^|\\|\\|\\||\\||\\?:|\\?\\?|\\?|:|\\$)?=([ \\t]+|(?m:$))").unwrap(),
                handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment),
            },
            RegexPattern { regex: Regex::new("^[ \\t\\r]+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Whitespace) },
            RegexPattern { regex: Regex::new("^null\\b").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LiteralNull) },
            RegexPattern { regex: Regex::new("^[0-9]+(\\.[0-9]+)?([eE][+-]?[0-9]+)?[lLfF]?\\b").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LiteralNumber) },
            RegexPattern { regex: Regex::new("^parser\\.[a-zA-Z_]\\w*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ParserFunctionIdentifier) },
            RegexPattern {
                regex: Regex::new("^(\\$\\**|&|fp\\.|mp\\.|func\\.|fn\\.|linker\\.|ln\\.)[a-zA-Z_]\\w*").unwrap(),
                handler: MK_DEFAULT_HANDLER!(TokenKind::Identifier),
            },
            RegexPattern { regex: Regex::new("^[(\\[]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpeningBracket) },
            RegexPattern { regex: Regex::new("^[)\\]]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ClosingBracket) },
            RegexPattern { regex: Regex::new("^\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpeningBlockBracket) },
            RegexPattern { regex: Regex::new("^\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ClosingBlockBracket) },
            RegexPattern { regex: Regex::new(&format!("^({})", operators)).unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Operator) },
            RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment) },
            RegexPattern { regex: Regex::new("^\\w[\\w.]*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Other) },
            RegexPattern { regex: Regex::new("^.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Other) },
        ]
    };
}

#[derive(Clone)]
pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(source: String) -> Lexer {
        Lexer::starting_at(source, 1, 1)
    }

    pub fn starting_at(source: String, line: u32, column: u32) -> Lexer {
        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            line,
            column,
        }
    }

    /// Moves the lexer past `matched`, keeping line and column in sync.
    pub fn advance(&mut self, matched: &str) {
        self.pos += matched.len();
        for c in matched.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// The position `text` would occupy if it started at the current offset.
    pub fn position_of(&self, text: &str) -> CodePosition {
        let mut line_to = self.line;
        let mut column_to = self.column;
        for c in text.chars() {
            if c == '\n' {
                line_to += 1;
                column_to = 1;
            } else {
                column_to += 1;
            }
        }

        CodePosition::new(self.line, line_to, self.column, column_to)
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn lex(&mut self) {
        while !self.at_eof() {
            let mut matched = None;

            for pattern in PATTERNS.iter() {
                if let Some(found) = pattern.regex.find(self.remainder()) {
                    if found.start() == 0 && !found.as_str().is_empty() {
                        matched = Some((found.as_str().to_string(), pattern.handler));
                        break;
                    }
                }
            }

            match matched {
                Some((text, handler)) => handler(self, &text),
                // "^." matches every character except a bare newline which "^\r?\n" handles
                None => {
                    let rest = self.remainder().to_string();
                    let position = self.position_of(&rest);
                    self.push(MK_TOKEN!(TokenKind::LexerError, rest.clone(), position));
                    self.advance(&rest);
                }
            }
        }
    }
}

fn comment_handler(lexer: &mut Lexer, matched: &str) {
    let (kind, marker) = if matched.starts_with("##") {
        (TokenKind::StartDocComment, "##")
    } else {
        (TokenKind::StartComment, "#")
    };

    let position = lexer.position_of(marker);
    lexer.push(MK_TOKEN!(kind, String::from(marker), position));
    lexer.advance(marker);

    let text = &matched[marker.len()..];
    if !text.is_empty() {
        let position = lexer.position_of(text);
        lexer.push(MK_TOKEN!(TokenKind::Other, String::from(text), position));
        lexer.advance(text);
    }

    let position = lexer.position_of("");
    lexer.push(MK_TOKEN!(TokenKind::EndComment, String::new(), position));
}

fn escape_sequence_handler(lexer: &mut Lexer, matched: &str) {
    let position = lexer.position_of(matched);
    lexer.push(MK_TOKEN!(
        TokenKind::EscapeSequence,
        String::from(&matched[1..]),
        position
    ));
    lexer.advance(matched);
}

fn multiline_text_handler(lexer: &mut Lexer, matched: &str) {
    let content = &matched[3..matched.len() - 3];

    let position = lexer.position_of("{{{");
    lexer.push(MK_TOKEN!(TokenKind::StartMultilineText, String::from("{{{"), position));
    lexer.advance("{{{");

    let position = lexer.position_of(content);
    lexer.push(MK_TOKEN!(TokenKind::LiteralText, String::from(content), position));
    lexer.advance(content);

    let position = lexer.position_of("}}}");
    lexer.push(MK_TOKEN!(TokenKind::EndMultilineText, String::from("}}}"), position));
    lexer.advance("}}}");
}

fn text_quotes_handler(lexer: &mut Lexer, matched: &str) {
    let position = lexer.position_of(matched);
    lexer.push(MK_TOKEN!(
        TokenKind::LiteralText,
        String::from(&matched[1..matched.len() - 1]),
        position
    ));
    lexer.advance(matched);
}

/// Converts source text into tokens. Always ends with an `Eof` token.
///
/// Lexing never fails: malformed input (e.g. unterminated text quotes) is
/// reported as `LexerError` tokens for the parser to turn into error nodes.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lex = Lexer::new(String::from(source));
    lex.lex();

    let position = lex.position_of("");
    lex.push(MK_TOKEN!(TokenKind::Eof, String::from("EOF"), position));
    lex.tokens
}

/// Lexes a fragment of an already lexed token, e.g. the remainder of a split
/// identifier. The result has no trailing `Eof` token.
pub fn retokenize(text: &str, position: CodePosition) -> Vec<Token> {
    let mut lex = Lexer::starting_at(String::from(text), position.line_from, position.column_from);
    lex.lex();
    lex.tokens
}
