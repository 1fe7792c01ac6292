//! The AT&T-syntax lexer.
//!
//! Scans source text left to right into a flat token stream: mnemonics
//! (split into base and size suffix against the instruction catalog),
//! `%`-registers, `$`-immediates, commas, and the whole family of memory
//! operand shapes from a bare displacement up to `disp(base,index,scale)`.
//! The first error aborts the scan; there is no recovery.

use std::str::FromStr;
use std::{fmt, iter::Peekable, str::Chars};

use crate::instruction::information::{Mnemonic, Variant};
use crate::instruction::instruction_set::INSTRUCTION_SET;
use crate::parse::number::{self, ParsedInteger};
use crate::parse::span::{Span, SrcPos, SrcSpan};
use crate::parse::token::{MemoryOperand, Token, TokenKind};
use crate::registers::Register;

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    UnsupportedInstruction(String),
    ExpectedWhitespaceAfterInstruction(String),
    ExpectedNewlineBeforeSubsequentInstruction(String),
    UnexpectedRegister(String),
    InvalidBaseRegister(String),
    InvalidIndexRegister(String),
    InvalidAddressing(String),
    MissingClosingParenthesis,
    MissingOpeningParenthesis,
    EmptyImmediate,
    InvalidNumber(String),
    UnexpectedCharacter(char),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnsupportedInstruction(text) => {
                write!(f, "unsupported instruction \"{}\"", text)
            }
            ErrorKind::ExpectedWhitespaceAfterInstruction(text) => {
                write!(f, "expected whitespace after instruction \"{}\"", text)
            }
            ErrorKind::ExpectedNewlineBeforeSubsequentInstruction(text) => {
                write!(
                    f,
                    "expected newline before subsequent instruction \"{}\"",
                    text
                )
            }
            ErrorKind::UnexpectedRegister(text) => {
                write!(f, "unexpected register \"{}\"", text)
            }
            ErrorKind::InvalidBaseRegister(text) => {
                write!(f, "invalid base register \"{}\"", text)
            }
            ErrorKind::InvalidIndexRegister(text) => {
                write!(f, "invalid index register \"{}\"", text)
            }
            ErrorKind::InvalidAddressing(text) => {
                write!(f, "invalid addressing \"{}\"", text)
            }
            ErrorKind::MissingClosingParenthesis => write!(f, "missing closing parenthesis"),
            ErrorKind::MissingOpeningParenthesis => write!(f, "missing opening parenthesis"),
            ErrorKind::EmptyImmediate => write!(f, "empty immediate"),
            ErrorKind::InvalidNumber(text) => write!(f, "invalid number \"{}\"", text),
            ErrorKind::UnexpectedCharacter(c) => write!(f, "unexpected character \"{}\"", c),
        }
    }
}

pub type LexError = Span<ErrorKind>;
pub type LexerResult<T> = Result<T, LexError>;

type CharScanner<'a> = Peekable<Chars<'a>>;

enum MemField {
    Base,
    Index,
}

pub struct Lexer<'a> {
    chars: CharScanner<'a>,
    pos: SrcPos,
    lexeme_start: Option<SrcPos>,
    // whether an instruction has already been lexed on the current line
    statement_open: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            chars: src.chars().peekable(),
            pos: SrcPos::default(),
            lexeme_start: None,
            statement_open: false,
        }
    }

    fn src_span(&self) -> SrcSpan {
        let start = self.lexeme_start.as_ref().unwrap_or(&self.pos).clone();

        SrcSpan {
            start,
            end: self.pos.clone(),
        }
    }

    fn span<T>(&self, kind: T) -> Span<T> {
        Span {
            src_span: self.src_span(),
            kind,
        }
    }

    fn token(&self, kind: TokenKind, text: String) -> Token {
        Token {
            kind,
            text,
            src_span: self.src_span(),
        }
    }

    /// get the next char and advance the position
    fn next_char(&mut self) -> Option<char> {
        self.chars.next().inspect(|c| {
            self.pos.pos += 1;
            self.pos.line_pos += 1;
            if *c == '\n' {
                self.pos.line_pos = 0;
                self.pos.line += 1;
            }
        })
    }

    /// lookahead without consuming
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// consume the next char only if a predicate holds
    fn next_char_if<P: Fn(char) -> bool>(&mut self, p: P) -> Option<char> {
        self.peek_char().filter(|c| p(*c)).and_then(|_| self.next_char())
    }

    /// consume chars while a predicate holds
    fn consume_while<P: Fn(char) -> bool>(&mut self, p: P) {
        while self.next_char_if(&p).is_some() {}
    }

    /// optional `-`, then a run of alphanumerics; validation happens later
    fn collect_integer_literal(&mut self) -> String {
        let mut literal = String::new();
        if let Some(c) = self.next_char_if(|c| c == '-') {
            literal.push(c);
        }
        while let Some(c) = self.next_char_if(|c| c.is_ascii_alphanumeric()) {
            literal.push(c);
        }
        literal
    }

    fn lex_mnemonic(&mut self) -> LexerResult<Token> {
        let mut run = String::new();
        while let Some(c) = self.next_char_if(|c| c.is_ascii_alphabetic()) {
            run.push(c.to_ascii_uppercase());
        }

        if self.statement_open {
            return Err(self.span(ErrorKind::ExpectedNewlineBeforeSubsequentInstruction(run)));
        }

        let Some((mnemonic, variant, matched)) = split_mnemonic(&run) else {
            return Err(self.span(ErrorKind::UnsupportedInstruction(run)));
        };

        // A matched prefix shorter than the run means the mnemonic ran
        // straight into more letters.
        if matched < run.len() {
            return Err(self.span(ErrorKind::ExpectedWhitespaceAfterInstruction(run)));
        }

        match self.peek_char() {
            None => {}
            Some(c) if c.is_whitespace() => {}
            Some(_) => {
                return Err(self.span(ErrorKind::ExpectedWhitespaceAfterInstruction(run)));
            }
        }

        self.statement_open = true;
        Ok(self.token(TokenKind::Instruction { mnemonic, variant }, run))
    }

    fn lex_register(&mut self) -> LexerResult<Token> {
        self.next_char();

        let mut name = String::new();
        while let Some(c) = self.next_char_if(|c| c.is_ascii_alphanumeric()) {
            name.push(c.to_ascii_uppercase());
        }

        let text = format!("%{}", name);
        let Ok(register) = Register::from_str(&name) else {
            return Err(self.span(ErrorKind::UnexpectedRegister(text)));
        };

        Ok(self.token(TokenKind::Register(register), text))
    }

    fn lex_immediate(&mut self) -> LexerResult<Token> {
        self.next_char();

        let literal = self.collect_integer_literal();
        let parsed = match number::parse_integer(&literal) {
            Ok(parsed) => parsed,
            Err(number::ErrorKind::Empty) => return Err(self.span(ErrorKind::EmptyImmediate)),
            Err(number::ErrorKind::Invalid(literal)) => {
                return Err(self.span(ErrorKind::InvalidNumber(literal)))
            }
        };

        let text = format!("${}", parsed.canonical);
        Ok(self.token(TokenKind::Immediate(parsed.value), text))
    }

    /// A numeric operand is either a bare displacement or the displacement
    /// prefix of a parenthesized memory operand.
    fn lex_numeric_operand(&mut self) -> LexerResult<Token> {
        let literal = self.collect_integer_literal();
        let Ok(parsed) = number::parse_integer(&literal) else {
            return Err(self.span(ErrorKind::InvalidNumber(literal)));
        };

        if self.peek_char() == Some('(') {
            return self.lex_memory(Some(parsed));
        }

        let operand = MemoryOperand {
            displacement: Some(parsed.value),
            base: None,
            index: None,
            scale: None,
        };
        Ok(self.token(TokenKind::Memory(operand), parsed.canonical))
    }

    fn memory_register(&self, field: &str, which: MemField) -> LexerResult<Register> {
        let upper = field.trim().to_uppercase();

        let register = upper
            .strip_prefix('%')
            .and_then(|name| Register::from_str(name).ok());

        match register {
            Some(register) => Ok(register),
            None => Err(self.span(match which {
                MemField::Base => ErrorKind::InvalidBaseRegister(upper),
                MemField::Index => ErrorKind::InvalidIndexRegister(upper),
            })),
        }
    }

    fn lex_memory(&mut self, displacement: Option<ParsedInteger>) -> LexerResult<Token> {
        self.next_char();

        let mut inner = String::new();
        loop {
            match self.next_char() {
                None | Some('\n') => {
                    return Err(self.span(ErrorKind::MissingClosingParenthesis))
                }
                Some(')') => break,
                Some(c) => inner.push(c),
            }
        }

        // Error reporting keeps the raw spacing; only the case changes.
        let reported = format!("({})", inner.to_uppercase());

        let fields: Vec<&str> = inner.split(',').collect();
        let (base, index, scale) = match fields.as_slice() {
            [base] => (Some(self.memory_register(base, MemField::Base)?), None, None),
            [base, index] => (
                Some(self.memory_register(base, MemField::Base)?),
                Some(self.memory_register(index, MemField::Index)?),
                None,
            ),
            [base, index, scale] => {
                let base = if base.trim().is_empty() {
                    None
                } else {
                    Some(self.memory_register(base, MemField::Base)?)
                };
                let index = self.memory_register(index, MemField::Index)?;
                let Ok(scale) = number::parse_integer(scale.trim()) else {
                    return Err(self.span(ErrorKind::InvalidAddressing(reported)));
                };
                (base, Some(index), Some(scale))
            }
            _ => return Err(self.span(ErrorKind::InvalidAddressing(reported))),
        };

        let mut text = String::new();
        if let Some(displacement) = &displacement {
            text.push_str(&displacement.canonical);
        }
        text.push('(');
        if let Some(register) = base {
            text.push('%');
            text.push_str(register.name());
        }
        if let Some(register) = index {
            text.push(',');
            text.push('%');
            text.push_str(register.name());
            if let Some(scale) = &scale {
                text.push(',');
                text.push_str(&scale.canonical);
            }
        }
        text.push(')');

        let operand = MemoryOperand {
            displacement: displacement.map(|d| d.value),
            base,
            index,
            scale: scale.map(|s| s.value),
        };
        Ok(self.token(TokenKind::Memory(operand), text))
    }

    pub fn next_tok(&mut self) -> LexerResult<Option<Token>> {
        loop {
            self.consume_while(|c| c.is_whitespace() && c != '\n');

            if self.next_char_if(|c| c == '#').is_some() {
                self.consume_while(|c| c != '\n');
                continue;
            }

            if self.next_char_if(|c| c == '\n').is_some() {
                self.statement_open = false;
                continue;
            }

            break;
        }

        self.lexeme_start = Some(self.pos.clone());

        let Some(c) = self.peek_char() else {
            return Ok(None);
        };

        let tok = match c {
            ',' => {
                self.next_char();
                self.token(TokenKind::Comma, ",".to_string())
            }
            'a'..='z' | 'A'..='Z' => self.lex_mnemonic()?,
            '%' => self.lex_register()?,
            '$' => self.lex_immediate()?,
            '(' => self.lex_memory(None)?,
            '-' | '0'..='9' => self.lex_numeric_operand()?,
            ')' => {
                self.next_char();
                return Err(self.span(ErrorKind::MissingOpeningParenthesis));
            }
            c => {
                self.next_char();
                return Err(self.span(ErrorKind::UnexpectedCharacter(c)));
            }
        };

        Ok(Some(tok))
    }
}

/// Split an uppercased alphabetic run into the longest leading `(base,
/// variant)` pair the catalog knows, returning how much of the run matched.
fn split_mnemonic(run: &str) -> Option<(Mnemonic, Option<Variant>, usize)> {
    for len in (1..=run.len()).rev() {
        let prefix = &run[..len];
        for info in INSTRUCTION_SET {
            let base = info.mnemonic.name();
            if prefix == base {
                return Some((info.mnemonic, None, len));
            }
            let Some(suffix) = prefix.strip_prefix(base) else {
                continue;
            };
            if let Ok(variant) = Variant::from_str(suffix) {
                if info.supported_variants.contains(&variant) {
                    return Some((info.mnemonic, Some(variant), len));
                }
            }
        }
    }
    None
}

/// Tokenize a whole source buffer, stopping at the first error.
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(src);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next_tok()? {
        tokens.push(token);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    fn texts(src: &str) -> Vec<String> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|token| token.text)
            .collect()
    }

    fn error_kind(src: &str) -> ErrorKind {
        tokenize(src).unwrap_err().kind
    }

    fn memory_operand(src: &str) -> (MemoryOperand, String) {
        let tokens = tokenize(src).unwrap();
        match tokens.into_iter().nth(1) {
            Some(Token {
                kind: TokenKind::Memory(operand),
                text,
                ..
            }) => (operand, text),
            other => panic!("expected a memory operand, got {other:?}"),
        }
    }

    macro_rules! lex_group {
        { $name:ident, $($test:ident : $src:literal = $expected:expr),+ $(,)? } => {
            mod $name {
                use super::*;
                use super::assert_eq;

                $(
                    #[test]
                    fn $test() {
                        assert_eq!(texts($src), $expected);
                    }
                )+
            }
        };
    }

    lex_group! {
        statements,
        register_to_register: "MOV %rax, %rbx" = ["MOV", "%RAX", ",", "%RBX"],
        lowercase_source: "mov %rax, %rbx" = ["MOV", "%RAX", ",", "%RBX"],
        immediate: "ADDQ $-12, %rax" = ["ADDQ", "$-12", ",", "%RAX"],
        no_operands: "NOP" = ["NOP"],
        multiline: "MOV %rax, %rbx\nADD %rcx, %rdx" =
            ["MOV", "%RAX", ",", "%RBX", "ADD", "%RCX", ",", "%RDX"],
        comments: "MOV %rax, %rbx # copy\n# full-line comment\nNOP" =
            ["MOV", "%RAX", ",", "%RBX", "NOP"],
        blank_lines: "\n\nMOV %rax, %rbx\n\n" = ["MOV", "%RAX", ",", "%RBX"],
    }

    lex_group! {
        memory_shapes,
        bare_displacement: "MOV 0x10, %rax" = ["MOV", "0x10", ",", "%RAX"],
        base: "MOV (%rax), %rbx" = ["MOV", "(%RAX)", ",", "%RBX"],
        disp_base: "MOV -123(%rax), %rbx" = ["MOV", "-123(%RAX)", ",", "%RBX"],
        base_index: "MOV (%rax, %rbx), %rcx" = ["MOV", "(%RAX,%RBX)", ",", "%RCX"],
        disp_base_index: "MOV 8(%rax,%rbx), %rcx" = ["MOV", "8(%RAX,%RBX)", ",", "%RCX"],
        index_scale: "MOV (,%rbx,8), %rcx" = ["MOV", "(,%RBX,8)", ",", "%RCX"],
        disp_index_scale: "MOV 0x20(, %rbx, 4), %rcx" = ["MOV", "0x20(,%RBX,4)", ",", "%RCX"],
        base_index_scale: "MOV (%rax,%rbx,8), %rcx" = ["MOV", "(%RAX,%RBX,8)", ",", "%RCX"],
        full_form: "MOV 0x123abc(%rax, %rbx, 8), %rcx" =
            ["MOV", "0x123ABC(%RAX,%RBX,8)", ",", "%RCX"],
    }

    #[test]
    fn instruction_token_splits_variant() {
        let tokens = tokenize("MOVABSQ $0x1234567890abcdef, %rax").unwrap();
        assert_eq!(
            tokens[0].kind,
            TokenKind::Instruction {
                mnemonic: Mnemonic::MOV,
                variant: Some(Variant::ABSQ),
            }
        );
        assert_eq!(tokens[0].text, "MOVABSQ");
        assert_eq!(
            tokens[1].kind,
            TokenKind::Immediate(1_311_768_467_294_899_695)
        );
        assert_eq!(tokens[1].text, "$0x1234567890ABCDEF");
    }

    #[test]
    fn bare_mnemonic_has_no_variant() {
        let tokens = tokenize("MOV %rax, %rbx").unwrap();
        assert_eq!(
            tokens[0].kind,
            TokenKind::Instruction {
                mnemonic: Mnemonic::MOV,
                variant: None,
            }
        );
    }

    #[test]
    fn extension_mnemonics_split_after_longest_base() {
        let tokens = tokenize("MOVZBL %al, %ebx").unwrap();
        assert_eq!(
            tokens[0].kind,
            TokenKind::Instruction {
                mnemonic: Mnemonic::MOVZ,
                variant: Some(Variant::BL),
            }
        );
        let tokens = tokenize("MOVSLQ %eax, %rbx").unwrap();
        assert_eq!(
            tokens[0].kind,
            TokenKind::Instruction {
                mnemonic: Mnemonic::MOVS,
                variant: Some(Variant::LQ),
            }
        );
    }

    #[test]
    fn full_memory_operand_payload() {
        let (operand, text) = memory_operand("MOV 0x123abc(%rax, %rbx, 8), %rcx");
        assert_eq!(text, "0x123ABC(%RAX,%RBX,8)");
        assert_eq!(
            operand,
            MemoryOperand {
                displacement: Some(1_194_684),
                base: Some(Register::RAX),
                index: Some(Register::RBX),
                scale: Some(8),
            }
        );
    }

    #[test]
    fn negative_displacement_payload() {
        let (operand, text) = memory_operand("MOV -123(%rax), %rbx");
        assert_eq!(text, "-123(%RAX)");
        assert_eq!(
            operand,
            MemoryOperand {
                displacement: Some(-123),
                base: Some(Register::RAX),
                index: None,
                scale: None,
            }
        );
    }

    #[test]
    fn scaled_index_without_base() {
        let (operand, text) = memory_operand("MOV (,%rbx,8), %rcx");
        assert_eq!(text, "(,%RBX,8)");
        assert_eq!(
            operand,
            MemoryOperand {
                displacement: None,
                base: None,
                index: Some(Register::RBX),
                scale: Some(8),
            }
        );
    }

    #[test]
    fn memory_token_text_reparses_to_same_payload() {
        let shapes = [
            "0x10",
            "(%rax)",
            "-123(%rax)",
            "(%rax,%rbx)",
            "8(%rax, %rbx)",
            "(,%rbx,8)",
            "0x20(,%rbx,4)",
            "(%rax,%rbx,8)",
            "0x123abc(%rax, %rbx, 8)",
        ];
        for shape in shapes {
            let (operand, text) = memory_operand(&format!("MOV {shape}, %r8"));
            let (reparsed, retext) = memory_operand(&format!("MOV {text}, %r8"));
            assert_eq!(operand, reparsed, "{shape}");
            assert_eq!(text, retext, "{shape}");
        }
    }

    #[test]
    fn relexing_canonical_source_is_identity() {
        let lines = [
            "mov 0x123abc(%rax, %rbx, 8), %rcx",
            "addq $-0X1f, %r9",
            "movzbl %al, %ebx",
        ];

        let canonical = lines
            .iter()
            .map(|line| {
                tokenize(line)
                    .unwrap()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        let first = tokenize(&lines.join("\n")).unwrap();
        let second = tokenize(&canonical).unwrap();
        let kinds = |tokens: &[Token]| tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>();
        let texts = |tokens: &[Token]| tokens.iter().map(|t| t.text.clone()).collect::<Vec<_>>();
        assert_eq!(kinds(&first), kinds(&second));
        assert_eq!(texts(&first), texts(&second));
    }

    #[test]
    fn every_cataloged_mnemonic_lexes() {
        for info in INSTRUCTION_SET {
            let src = format!("{} %rax, %rbx", info.mnemonic.name());
            let tokens = tokenize(&src).unwrap();
            assert_eq!(
                tokens[0].kind,
                TokenKind::Instruction {
                    mnemonic: info.mnemonic,
                    variant: None,
                },
                "{src}"
            );
        }
    }

    #[test]
    fn every_cataloged_register_lexes() {
        for register in Register::iter() {
            let src = format!("MOV 0x1, %{}", register.name());
            let tokens = tokenize(&src).unwrap();
            assert_eq!(tokens[3].kind, TokenKind::Register(register), "{src}");
        }
    }

    #[test]
    fn missing_newline_between_statements() {
        assert_eq!(
            error_kind("MOV %rax, %rbx ADD %rax, %rbx"),
            ErrorKind::ExpectedNewlineBeforeSubsequentInstruction("ADD".to_string())
        );
    }

    #[test]
    fn unsupported_instruction() {
        assert_eq!(
            error_kind("FROB %rax, %rbx"),
            ErrorKind::UnsupportedInstruction("FROB".to_string())
        );
    }

    #[test]
    fn mnemonic_must_be_followed_by_whitespace() {
        assert_eq!(
            error_kind("MOV%rax, %rbx"),
            ErrorKind::ExpectedWhitespaceAfterInstruction("MOV".to_string())
        );
        // A width suffix running into further letters trips the same rule.
        assert_eq!(
            error_kind("MOVQX %rax"),
            ErrorKind::ExpectedWhitespaceAfterInstruction("MOVQX".to_string())
        );
    }

    #[test]
    fn unexpected_register() {
        assert_eq!(
            error_kind("MOV %raz, %rbx"),
            ErrorKind::UnexpectedRegister("%RAZ".to_string())
        );
    }

    #[test]
    fn invalid_base_register() {
        assert_eq!(
            error_kind("MOV (%foo), %rbx"),
            ErrorKind::InvalidBaseRegister("%FOO".to_string())
        );
        assert_eq!(
            error_kind("MOV (rax), %rbx"),
            ErrorKind::InvalidBaseRegister("RAX".to_string())
        );
        assert_eq!(error_kind("MOV (), %rbx"), ErrorKind::InvalidBaseRegister(String::new()));
    }

    #[test]
    fn invalid_index_register() {
        assert_eq!(
            error_kind("MOV (%rax,,8), %rcx"),
            ErrorKind::InvalidIndexRegister(String::new())
        );
    }

    #[test]
    fn invalid_addressing() {
        assert_eq!(
            error_kind("MOV 0x123abc(%rax, %rbx, 8, %rcx), %rdx"),
            ErrorKind::InvalidAddressing("(%RAX, %RBX, 8, %RCX)".to_string())
        );
        assert_eq!(
            error_kind("MOV (%rax,%rbx,%rcx), %rdx"),
            ErrorKind::InvalidAddressing("(%RAX,%RBX,%RCX)".to_string())
        );
    }

    #[test]
    fn unbalanced_parentheses() {
        assert_eq!(
            error_kind("MOV (%rax, %rbx"),
            ErrorKind::MissingClosingParenthesis
        );
        assert_eq!(
            error_kind("MOV 8(%rax\n), %rbx"),
            ErrorKind::MissingClosingParenthesis
        );
        assert_eq!(
            error_kind("MOV %rax), %rbx"),
            ErrorKind::MissingOpeningParenthesis
        );
    }

    #[test]
    fn empty_immediate() {
        assert_eq!(error_kind("MOV $, %rax"), ErrorKind::EmptyImmediate);
        assert_eq!(error_kind("MOV $-, %rax"), ErrorKind::EmptyImmediate);
    }

    #[test]
    fn invalid_number() {
        assert_eq!(
            error_kind("MOV $0xfg, %rax"),
            ErrorKind::InvalidNumber("0xfg".to_string())
        );
        assert_eq!(
            error_kind("MOV 12ab, %rax"),
            ErrorKind::InvalidNumber("12ab".to_string())
        );
    }

    #[test]
    fn unexpected_character() {
        assert_eq!(
            error_kind("MOV %rax, %rbx @"),
            ErrorKind::UnexpectedCharacter('@')
        );
    }

    #[test]
    fn error_spans_point_at_the_lexeme() {
        let error = tokenize("MOV %rax, %rbx\nMOV %raz, %rbx").unwrap_err();
        assert_eq!(error.src_span.start.line, 1);
        assert_eq!(error.src_span.start.line_pos, 4);
    }
}
