//! Syntax kinds for the rowan-based CST.
//!
//! This enum defines all possible node and token kinds in the syntax tree
//! of the script language the editing layer operates on.

/// All syntax kinds (tokens and nodes).
///
/// Tokens are leaf elements (identifiers, keywords, punctuation).
/// Nodes are composite (declarations, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERAL TOKENS
    // =========================================================================
    IDENT,              // identifier
    INT_NUMBER,         // 42
    STRING,             // "hello"

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,            // {
    R_BRACE,            // }
    L_BRACKET,          // [
    R_BRACKET,          // ]
    L_PAREN,            // (
    R_PAREN,            // )
    SEMICOLON,          // ;
    COMMA,              // ,
    DOT,                // .
    EQ,                 // =
    EQ_EQ,              // ==
    BANG_EQ,            // !=
    LT,                 // <
    GT,                 // >
    LT_EQ,              // <=
    GT_EQ,              // >=
    PLUS,               // +
    MINUS,              // -
    STAR,               // *
    SLASH,              // /
    PERCENT,            // %
    BANG,               // !
    AMP_AMP,            // &&
    PIPE_PIPE,          // ||

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    FUNCTION_KW,
    LET_KW,
    RETURN_KW,
    IF_KW,
    ELSE_KW,
    WHILE_KW,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,

    // Declarations
    FUNCTION_DECL,
    PARAM_LIST,
    PARAM,
    NAME,

    // Statements
    BLOCK,
    LET_STMT,
    RETURN_STMT,
    IF_STMT,
    WHILE_STMT,
    EXPR_STMT,

    // Expressions
    NAME_REF,
    LITERAL,
    PREFIX_EXPR,
    BINARY_EXPR,
    CALL_EXPR,
    ARG_LIST,
    ARRAY_EXPR,
    ELEMENT_LIST,
    PAREN_EXPR,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::FUNCTION_KW as u16) && (self as u16) <= (Self::NULL_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::PIPE_PIPE as u16)
    }

    /// Check if this kind is a composite node rather than a token
    pub fn is_node(self) -> bool {
        (self as u16) >= (Self::SOURCE_FILE as u16)
    }

    /// Purely grammatical grouping kinds: nodes that exist only to group
    /// their children and can legally vanish when those children go away.
    pub fn is_grouping(self) -> bool {
        matches!(self, Self::ELEMENT_LIST | Self::ARG_LIST | Self::PAREN_EXPR)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScriptLanguage {}

impl rowan::Language for ScriptLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<ScriptLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<ScriptLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<ScriptLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<ScriptLanguage>;
