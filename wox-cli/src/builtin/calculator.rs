//! Calculator - evaluates arithmetic typed into the launcher

use std::sync::OnceLock;

use async_trait::async_trait;
use thiserror::Error;
use wox_plugin_api::{
    Metadata, Plugin, PluginError, PluginInitContext, Query, Runtime, WoxImage, WoxResult,
    WoxResultAction,
};

pub const PLUGIN_ID: &str = "bd723c38-f28d-4152-8621-76fd21d6456e";

/// Setting key for the number of decimal places shown
pub const PRECISION_SETTING: &str = "precision";

const DEFAULT_PRECISION: usize = 10;

/// Deepest run of parentheses and unary minus the parser will follow
pub const MAX_NESTING: usize = 256;

pub fn metadata() -> Metadata {
    let mut metadata = Metadata::new(PLUGIN_ID, "Calculator", Runtime::Go)
        .with_trigger_keywords(["calc", "*"])
        .with_website("https://github.com/Wox-launcher/Wox");
    metadata.author = "Wox Launcher".to_string();
    metadata.version = "1.0.0".to_string();
    metadata.description = "Calculate simple arithmetic expressions".to_string();
    metadata
}

#[derive(Default)]
pub struct CalculatorPlugin {
    ctx: OnceLock<PluginInitContext>,
}

impl CalculatorPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    fn precision(&self) -> usize {
        self.ctx
            .get()
            .and_then(|ctx| ctx.api().get_setting(PRECISION_SETTING).ok().flatten())
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PRECISION)
    }
}

#[async_trait]
impl Plugin for CalculatorPlugin {
    async fn init(&self, ctx: PluginInitContext) -> Result<(), PluginError> {
        ctx.log_debug("calculator ready");
        self.ctx
            .set(ctx)
            .map_err(|_| PluginError::init("calculator initialized twice"))
    }

    async fn query(&self, query: &Query) -> Result<Vec<WoxResult>, PluginError> {
        let expression = query.search.trim();
        // A bare number typed globally is not a calculation
        if !looks_like_expression(expression) {
            return Ok(Vec::new());
        }

        match evaluate(expression) {
            Ok(value) => {
                let answer = format_number(value, self.precision());
                Ok(vec![
                    WoxResult::new(answer.clone())
                        .with_sub_title(format!("{expression} = {answer}"))
                        .with_icon(WoxImage::emoji("🧮"))
                        .with_score(300)
                        .with_action(WoxResultAction::new("copy", "Copy result").default_action()),
                ])
            }
            // Half-typed input is normal while the user types
            Err(_) => Ok(Vec::new()),
        }
    }
}

fn looks_like_expression(input: &str) -> bool {
    input.chars().any(|c| c.is_ascii_digit())
        && input.chars().any(|c| matches!(c, '+' | '-' | '*' | '/' | '('))
}

#[derive(Error, Debug, PartialEq)]
pub enum CalcError {
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected '{found}' at position {position}")]
    UnexpectedChar { found: char, position: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("expression nested deeper than {} levels", MAX_NESTING)]
    TooDeep,
}

/// Evaluate `+ - * /` with parentheses and unary minus
pub fn evaluate(input: &str) -> Result<f64, CalcError> {
    let mut parser = Parser {
        chars: input.chars().collect(),
        pos: 0,
        depth: 0,
    };
    let value = parser.expression()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(value),
        Some(found) => Err(CalcError::UnexpectedChar {
            found,
            position: parser.pos,
        }),
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn next_operator(&mut self, operators: &[char]) -> Option<char> {
        self.skip_whitespace();
        let op = self.peek().filter(|c| operators.contains(c))?;
        self.pos += 1;
        Some(op)
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        while let Some(op) = self.next_operator(&['+', '-']) {
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.factor()?;
        while let Some(op) = self.next_operator(&['*', '/']) {
            let rhs = self.factor()?;
            if op == '*' {
                value *= rhs;
            } else if rhs == 0.0 {
                return Err(CalcError::DivisionByZero);
            } else {
                value /= rhs;
            }
        }
        Ok(value)
    }

    // factor := '-' factor | '(' expression ')' | number
    fn factor(&mut self) -> Result<f64, CalcError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(CalcError::UnexpectedEnd),
            Some('-') => {
                self.pos += 1;
                let value = self.nested(Self::factor)?;
                Ok(-value)
            }
            Some('(') => {
                self.pos += 1;
                let value = self.nested(Self::expression)?;
                self.skip_whitespace();
                match self.peek() {
                    Some(')') => {
                        self.pos += 1;
                        Ok(value)
                    }
                    Some(found) => Err(CalcError::UnexpectedChar {
                        found,
                        position: self.pos,
                    }),
                    None => Err(CalcError::UnexpectedEnd),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(found) => Err(CalcError::UnexpectedChar {
                found,
                position: self.pos,
            }),
        }
    }

    /// Recurse one level, refusing to go past [`MAX_NESTING`]
    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<f64, CalcError>,
    ) -> Result<f64, CalcError> {
        if self.depth >= MAX_NESTING {
            return Err(CalcError::TooDeep);
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn number(&mut self) -> Result<f64, CalcError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
        {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        literal
            .parse()
            .map_err(|_| CalcError::InvalidNumber(literal))
    }
}

fn format_number(value: f64, precision: usize) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let fixed = format!("{value:.precision$}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}
