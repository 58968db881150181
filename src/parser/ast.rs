//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode and provides methods to access children.
//! Shared shapes ("has a name", "has a body") are capability traits so that
//! operations can be written once against the capability instead of
//! matching on concrete kinds at every call site.

use smol_str::SmolStr;

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

// ============================================================================
// Capabilities
// ============================================================================

/// Nodes that declare a name via a NAME child.
pub trait HasName: AstNode {
    fn name(&self) -> Option<Name> {
        self.syntax().children().find_map(Name::cast)
    }
}

/// Nodes that own a braced statement body.
pub trait HasBody: AstNode {
    fn body(&self) -> Option<Block> {
        self.syntax().children().find_map(Block::cast)
    }
}

/// Nodes that declare parameters.
pub trait HasParams: AstNode {
    fn param_list(&self) -> Option<ParamList> {
        self.syntax().children().find_map(ParamList::cast)
    }

    fn params(&self) -> Vec<Param> {
        self.param_list()
            .map(|list| list.params().collect())
            .unwrap_or_default()
    }
}

/// Check whether a node kind carries a NAME child in this grammar.
pub fn kind_has_name(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::FUNCTION_DECL | SyntaxKind::LET_STMT | SyntaxKind::PARAM
    )
}

// ============================================================================
// Root
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.0.children().filter_map(Item::cast)
    }

    pub fn functions(&self) -> impl Iterator<Item = FunctionDecl> + '_ {
        self.0.children().filter_map(FunctionDecl::cast)
    }
}

// ============================================================================
// Items and statements
// ============================================================================

/// Any top-level item or statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    Function(FunctionDecl),
    Let(LetStmt),
    Return(ReturnStmt),
    If(IfStmt),
    While(WhileStmt),
    Block(Block),
    Expr(ExprStmt),
}

impl AstNode for Item {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::FUNCTION_DECL
                | SyntaxKind::LET_STMT
                | SyntaxKind::RETURN_STMT
                | SyntaxKind::IF_STMT
                | SyntaxKind::WHILE_STMT
                | SyntaxKind::BLOCK
                | SyntaxKind::EXPR_STMT
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::FUNCTION_DECL => Some(Self::Function(FunctionDecl(node))),
            SyntaxKind::LET_STMT => Some(Self::Let(LetStmt(node))),
            SyntaxKind::RETURN_STMT => Some(Self::Return(ReturnStmt(node))),
            SyntaxKind::IF_STMT => Some(Self::If(IfStmt(node))),
            SyntaxKind::WHILE_STMT => Some(Self::While(WhileStmt(node))),
            SyntaxKind::BLOCK => Some(Self::Block(Block(node))),
            SyntaxKind::EXPR_STMT => Some(Self::Expr(ExprStmt(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Function(n) => n.syntax(),
            Self::Let(n) => n.syntax(),
            Self::Return(n) => n.syntax(),
            Self::If(n) => n.syntax(),
            Self::While(n) => n.syntax(),
            Self::Block(n) => n.syntax(),
            Self::Expr(n) => n.syntax(),
        }
    }
}

// ============================================================================
// Function declaration
// ============================================================================

ast_node!(FunctionDecl, FUNCTION_DECL);

impl HasName for FunctionDecl {}
impl HasBody for FunctionDecl {}
impl HasParams for FunctionDecl {}

impl FunctionDecl {
    /// A declaration-only function has no body: `function f(a);`
    pub fn is_declaration_only(&self) -> bool {
        self.body().is_none()
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.0.children().filter_map(Param::cast)
    }
}

ast_node!(Param, PARAM);

impl HasName for Param {}

// ============================================================================
// Statements
// ============================================================================

ast_node!(Block, BLOCK);

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = Item> + '_ {
        self.0.children().filter_map(Item::cast)
    }
}

ast_node!(LetStmt, LET_STMT);

impl HasName for LetStmt {}

impl LetStmt {
    pub fn initializer(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    pub fn value(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    pub fn condition(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn then_branch(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }

    pub fn else_branch(&self) -> Option<ElseBranch> {
        // Everything after the then-block: either a nested if or a block
        let then = self.then_branch()?;
        for sibling in self.0.children() {
            if sibling.text_range().start() <= then.syntax().text_range().start() {
                continue;
            }
            if let Some(nested) = IfStmt::cast(sibling.clone()) {
                return Some(ElseBranch::If(Box::new(nested)));
            }
            if let Some(block) = Block::cast(sibling) {
                return Some(ElseBranch::Block(block));
            }
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElseBranch {
    If(Box<IfStmt>),
    Block(Block),
}

ast_node!(WhileStmt, WHILE_STMT);

impl WhileStmt {
    pub fn condition(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn body(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }
}

ast_node!(ExprStmt, EXPR_STMT);

impl ExprStmt {
    pub fn expr(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// Any expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    NameRef(NameRef),
    Literal(Literal),
    Prefix(PrefixExpr),
    Binary(BinaryExpr),
    Call(CallExpr),
    Array(ArrayExpr),
    Paren(ParenExpr),
}

impl AstNode for Expr {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::NAME_REF
                | SyntaxKind::LITERAL
                | SyntaxKind::PREFIX_EXPR
                | SyntaxKind::BINARY_EXPR
                | SyntaxKind::CALL_EXPR
                | SyntaxKind::ARRAY_EXPR
                | SyntaxKind::PAREN_EXPR
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::NAME_REF => Some(Self::NameRef(NameRef(node))),
            SyntaxKind::LITERAL => Some(Self::Literal(Literal(node))),
            SyntaxKind::PREFIX_EXPR => Some(Self::Prefix(PrefixExpr(node))),
            SyntaxKind::BINARY_EXPR => Some(Self::Binary(BinaryExpr(node))),
            SyntaxKind::CALL_EXPR => Some(Self::Call(CallExpr(node))),
            SyntaxKind::ARRAY_EXPR => Some(Self::Array(ArrayExpr(node))),
            SyntaxKind::PAREN_EXPR => Some(Self::Paren(ParenExpr(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::NameRef(n) => n.syntax(),
            Self::Literal(n) => n.syntax(),
            Self::Prefix(n) => n.syntax(),
            Self::Binary(n) => n.syntax(),
            Self::Call(n) => n.syntax(),
            Self::Array(n) => n.syntax(),
            Self::Paren(n) => n.syntax(),
        }
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn text(&self) -> Option<SmolStr> {
        ident_token(&self.0).map(|t| SmolStr::new(t.text()))
    }
}

ast_node!(Literal, LITERAL);

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
    }
}

ast_node!(PrefixExpr, PREFIX_EXPR);

impl PrefixExpr {
    pub fn operand(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn rhs(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    pub fn op_token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_punct())
    }
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        self.0.children().find_map(ArgList::cast)
    }

    pub fn args(&self) -> Vec<Expr> {
        self.arg_list()
            .map(|list| list.args().collect())
            .unwrap_or_default()
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

ast_node!(ArrayExpr, ARRAY_EXPR);

impl ArrayExpr {
    pub fn element_list(&self) -> Option<ElementList> {
        self.0.children().find_map(ElementList::cast)
    }

    pub fn elements(&self) -> Vec<Expr> {
        self.element_list()
            .map(|list| list.elements().collect())
            .unwrap_or_default()
    }
}

ast_node!(ElementList, ELEMENT_LIST);

impl ElementList {
    pub fn elements(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

// ============================================================================
// Names
// ============================================================================

ast_node!(Name, NAME);

impl Name {
    pub fn text(&self) -> Option<SmolStr> {
        ident_token(&self.0).map(|t| SmolStr::new(t.text()))
    }

    /// The range of the identifier token itself, for rename edits.
    pub fn ident_range(&self) -> Option<text_size::TextRange> {
        ident_token(&self.0).map(|t| t.text_range())
    }
}

fn ident_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == SyntaxKind::IDENT)
}

// ============================================================================
// Tests
// ============================================================================
