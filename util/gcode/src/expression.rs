use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{all_consuming, map, map_res, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult,
};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExpressionError {
    #[error("cannot parse expression '{expression}'")]
    Syntax { expression: String },
    #[error("variable {name} is not defined")]
    UnresolvedVariable { name: String },
    #[error("expression '{expression}' does not evaluate to a finite number")]
    NonFinite { expression: String },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}
impl BinaryOperator {
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOperator::Add => lhs + rhs,
            BinaryOperator::Subtract => lhs - rhs,
            BinaryOperator::Multiply => lhs * rhs,
            BinaryOperator::Divide => lhs / rhs,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Number(f64),
    /// A parameter reference such as `#51`, stored with its `#`.
    Variable(String),
    Negate(Box<Expression>),
    Binary(BinaryOperator, Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn parse(text: &str) -> Result<Expression, ExpressionError> {
        all_consuming(expression)(text)
            .map(|(_, expression)| expression)
            .map_err(|_| ExpressionError::Syntax { expression: text.to_string() })
    }

    pub fn evaluate(&self, lookup: &impl Fn(&str) -> Option<f64>) -> Result<f64, ExpressionError> {
        Ok(match self {
            Expression::Number(value) => *value,
            Expression::Variable(name) => lookup(name.as_str()).ok_or_else(|| ExpressionError::UnresolvedVariable { name: name.clone() })?,
            Expression::Negate(inner) => -inner.evaluate(lookup)?,
            Expression::Binary(operator, lhs, rhs) => operator.apply(lhs.evaluate(lookup)?, rhs.evaluate(lookup)?),
        })
    }

    /// Variable names in order of appearance.
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }
    fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expression::Number(_) => (),
            Expression::Variable(name) => names.push(name.as_str()),
            Expression::Negate(inner) => inner.collect_variables(names),
            Expression::Binary(_, lhs, rhs) => {
                lhs.collect_variables(names);
                rhs.collect_variables(names);
            }
        }
    }
}

/// Parses and evaluates `text`, resolving `#<number>` parameters through `lookup`.
pub fn evaluate(text: &str, lookup: impl Fn(&str) -> Option<f64>) -> Result<f64, ExpressionError> {
    let value = Expression::parse(text)?.evaluate(&lookup)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ExpressionError::NonFinite { expression: text.to_string() })
    }
}

fn number(input: &str) -> IResult<&str, Expression> {
    map_res(
        take_while1(|c: char| c.is_ascii_digit() || c == '.'),
        |text: &str| text.parse::<f64>().map(Expression::Number),
    )(input)
}

fn variable(input: &str) -> IResult<&str, Expression> {
    map(recognize(preceded(char('#'), digit1)), |name: &str| Expression::Variable(name.to_string()))(input)
}

fn factor(input: &str) -> IResult<&str, Expression> {
    delimited(
        multispace0,
        alt((
            number,
            variable,
            delimited(char('('), expression, char(')')),
            map(preceded(char('-'), factor), |inner| Expression::Negate(Box::new(inner))),
            preceded(char('+'), factor),
        )),
        multispace0,
    )(input)
}

fn fold_operations(first: Expression, rest: Vec<(BinaryOperator, Expression)>) -> Expression {
    rest.into_iter().fold(first, |lhs, (operator, rhs)| {
        Expression::Binary(operator, Box::new(lhs), Box::new(rhs))
    })
}

fn term(input: &str) -> IResult<&str, Expression> {
    let (input, first) = factor(input)?;
    let (input, rest) = many0(pair(
        map(one_of("*/"), |c| if c == '*' { BinaryOperator::Multiply } else { BinaryOperator::Divide }),
        factor,
    ))(input)?;
    Ok((input, fold_operations(first, rest)))
}

fn expression(input: &str) -> IResult<&str, Expression> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(
        map(one_of("+-"), |c| if c == '+' { BinaryOperator::Add } else { BinaryOperator::Subtract }),
        term,
    ))(input)?;
    Ok((input, fold_operations(first, rest)))
}
