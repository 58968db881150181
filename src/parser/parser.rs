//! Recursive descent parser for the script language.
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST: every byte of the
//! input, trivia included, appears in the tree exactly once.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse source text into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// Statement-level recovery set: tokens that can start a new statement.
const STMT_RECOVERY: &[SyntaxKind] = &[
    SyntaxKind::FUNCTION_KW,
    SyntaxKind::LET_KW,
    SyntaxKind::RETURN_KW,
    SyntaxKind::IF_KW,
    SyntaxKind::WHILE_KW,
    SyntaxKind::L_BRACE,
    SyntaxKind::R_BRACE,
    SyntaxKind::SEMICOLON,
];

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump_any(&mut self) {
        self.bump();
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    fn skip_trivia(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.bump();
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .current()
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| TextRange::empty(TextSize::new(0)));
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.builder.start_node(SyntaxKind::ERROR.into());
        // Consume up to the recovery set; stopping at trivia keeps the
        // ERROR node tight around the offending tokens. Callers' loops
        // guarantee progress even when nothing is consumed here.
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) && !self.current_kind().is_trivia() {
            self.bump_any();
            consumed = true;
        }
        if !consumed && !self.at_eof() && !self.at_any(recovery) {
            self.bump_any();
        }
        self.builder.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn checkpoint(&self) -> Checkpoint {
        self.builder.checkpoint()
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// SourceFile = Item*
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);

        while !self.at_eof() {
            let pos_before = self.pos;
            self.skip_trivia();
            if self.at_eof() {
                break;
            }
            self.parse_item();
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump_any();
            }
        }

        self.finish_node();
    }

    /// Item = FunctionDecl | Statement
    fn parse_item(&mut self) {
        match self.current_kind() {
            SyntaxKind::FUNCTION_KW => self.parse_function_decl(),
            _ => self.parse_statement(),
        }
    }

    /// FunctionDecl = 'function' Name ParamList (Block | ';')
    ///
    /// The ';' form is the declaration-only shape the structural printer
    /// emits for ambient declarations.
    fn parse_function_decl(&mut self) {
        self.start_node(SyntaxKind::FUNCTION_DECL);
        self.bump(); // function
        self.skip_trivia();
        self.parse_name();
        self.skip_trivia();
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_param_list();
        } else {
            self.error("expected parameter list");
        }
        self.skip_trivia();
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else if !self.eat(SyntaxKind::SEMICOLON) {
            self.error("expected function body or ';'");
        }
        self.finish_node();
    }

    /// ParamList = '(' (Param (',' Param)*)? ')'
    fn parse_param_list(&mut self) {
        self.start_node(SyntaxKind::PARAM_LIST);
        self.bump(); // (
        self.skip_trivia();
        while !self.at(SyntaxKind::R_PAREN) && !self.at_eof() {
            self.start_node(SyntaxKind::PARAM);
            self.parse_name();
            self.finish_node();
            self.skip_trivia();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
            self.skip_trivia();
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// Name = IDENT
    fn parse_name(&mut self) {
        if self.at(SyntaxKind::IDENT) {
            self.start_node(SyntaxKind::NAME);
            self.bump();
            self.finish_node();
        } else {
            self.error("expected a name");
        }
    }

    /// Block = '{' Statement* '}'
    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::BLOCK);
        self.bump(); // {
        loop {
            self.skip_trivia();
            if self.at(SyntaxKind::R_BRACE) || self.at_eof() {
                break;
            }
            let pos_before = self.pos;
            self.parse_statement();
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump_any();
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// Statement = LetStmt | ReturnStmt | IfStmt | WhileStmt | Block | ExprStmt
    fn parse_statement(&mut self) {
        match self.current_kind() {
            SyntaxKind::LET_KW => self.parse_let_stmt(),
            SyntaxKind::RETURN_KW => self.parse_return_stmt(),
            SyntaxKind::IF_KW => self.parse_if_stmt(),
            SyntaxKind::WHILE_KW => self.parse_while_stmt(),
            SyntaxKind::L_BRACE => self.parse_block(),
            SyntaxKind::FUNCTION_KW => self.parse_function_decl(),
            kind if at_expr_start(kind) => self.parse_expr_stmt(),
            _ => self.error_recover("expected a statement", STMT_RECOVERY),
        }
    }

    /// LetStmt = 'let' Name '=' Expr ';'
    fn parse_let_stmt(&mut self) {
        self.start_node(SyntaxKind::LET_STMT);
        self.bump(); // let
        self.skip_trivia();
        self.parse_name();
        self.skip_trivia();
        if self.expect(SyntaxKind::EQ) {
            self.skip_trivia();
            self.parse_expr();
        }
        self.skip_trivia();
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// ReturnStmt = 'return' Expr? ';'
    fn parse_return_stmt(&mut self) {
        self.start_node(SyntaxKind::RETURN_STMT);
        self.bump(); // return
        self.skip_trivia();
        if !self.at(SyntaxKind::SEMICOLON) && at_expr_start(self.current_kind()) {
            self.parse_expr();
            self.skip_trivia();
        }
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// IfStmt = 'if' '(' Expr ')' Block ('else' (IfStmt | Block))?
    fn parse_if_stmt(&mut self) {
        self.start_node(SyntaxKind::IF_STMT);
        self.bump(); // if
        self.skip_trivia();
        if self.expect(SyntaxKind::L_PAREN) {
            self.skip_trivia();
            self.parse_expr();
            self.skip_trivia();
            self.expect(SyntaxKind::R_PAREN);
        }
        self.skip_trivia();
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else {
            self.error("expected a block");
        }
        self.skip_trivia();
        if self.eat(SyntaxKind::ELSE_KW) {
            self.skip_trivia();
            match self.current_kind() {
                SyntaxKind::IF_KW => self.parse_if_stmt(),
                SyntaxKind::L_BRACE => self.parse_block(),
                _ => self.error("expected 'if' or a block after 'else'"),
            }
        }
        self.finish_node();
    }

    /// WhileStmt = 'while' '(' Expr ')' Block
    fn parse_while_stmt(&mut self) {
        self.start_node(SyntaxKind::WHILE_STMT);
        self.bump(); // while
        self.skip_trivia();
        if self.expect(SyntaxKind::L_PAREN) {
            self.skip_trivia();
            self.parse_expr();
            self.skip_trivia();
            self.expect(SyntaxKind::R_PAREN);
        }
        self.skip_trivia();
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else {
            self.error("expected a block");
        }
        self.finish_node();
    }

    /// ExprStmt = Expr ';'
    fn parse_expr_stmt(&mut self) {
        self.start_node(SyntaxKind::EXPR_STMT);
        self.parse_expr();
        self.skip_trivia();
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    // =========================================================================
    // Expressions (precedence climbing)
    // =========================================================================

    fn parse_expr(&mut self) {
        self.parse_expr_bp(1);
    }

    /// Parse expressions with operators of at least `min_bp` binding power.
    fn parse_expr_bp(&mut self, min_bp: u8) {
        let checkpoint = self.checkpoint();
        self.parse_unary_expr();

        loop {
            self.skip_trivia();
            let Some(bp) = binary_binding_power(self.current_kind()) else {
                break;
            };
            if bp < min_bp {
                break;
            }
            self.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
            self.bump(); // operator
            self.skip_trivia();
            self.parse_expr_bp(bp + 1);
            self.finish_node();
        }
    }

    /// UnaryExpr = ('!' | '-') UnaryExpr | PostfixExpr
    fn parse_unary_expr(&mut self) {
        if self.at(SyntaxKind::BANG) || self.at(SyntaxKind::MINUS) {
            self.start_node(SyntaxKind::PREFIX_EXPR);
            self.bump();
            self.skip_trivia();
            self.parse_unary_expr();
            self.finish_node();
        } else {
            self.parse_postfix_expr();
        }
    }

    /// PostfixExpr = AtomExpr ('(' args ')')*
    fn parse_postfix_expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_atom_expr();

        loop {
            // Trivia between callee and '(' still binds: `f (x)` is a call.
            let mut probe = self.pos;
            while self.tokens.get(probe).map(|t| t.kind.is_trivia()).unwrap_or(false) {
                probe += 1;
            }
            if self.tokens.get(probe).map(|t| t.kind) != Some(SyntaxKind::L_PAREN) {
                break;
            }
            self.start_node_at(checkpoint, SyntaxKind::CALL_EXPR);
            self.skip_trivia();
            self.parse_arg_list();
            self.finish_node();
        }
    }

    /// Call arguments between '(' and ')'.
    ///
    /// The ARG_LIST node covers only the arguments themselves; with zero
    /// arguments no ARG_LIST node is produced at all, so the node appears
    /// and disappears as arguments come and go.
    fn parse_arg_list(&mut self) {
        self.bump(); // (
        self.skip_trivia();
        if !self.at(SyntaxKind::R_PAREN) && !self.at_eof() {
            self.start_node(SyntaxKind::ARG_LIST);
            loop {
                self.parse_expr();
                self.skip_trivia();
                if !self.at(SyntaxKind::COMMA) {
                    break;
                }
                self.bump(); // ,
                self.skip_trivia();
                if self.at(SyntaxKind::R_PAREN) || self.at_eof() {
                    break;
                }
            }
            self.finish_node();
        }
        self.expect(SyntaxKind::R_PAREN);
    }

    /// AtomExpr = Literal | NameRef | ParenExpr | ArrayExpr
    fn parse_atom_expr(&mut self) {
        match self.current_kind() {
            SyntaxKind::INT_NUMBER
            | SyntaxKind::STRING
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW
            | SyntaxKind::NULL_KW => {
                self.start_node(SyntaxKind::LITERAL);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::IDENT => {
                self.start_node(SyntaxKind::NAME_REF);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_EXPR);
                self.bump(); // (
                self.skip_trivia();
                self.parse_expr();
                self.skip_trivia();
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            SyntaxKind::L_BRACKET => self.parse_array_expr(),
            _ => self.error_recover("expected an expression", STMT_RECOVERY),
        }
    }

    /// ArrayExpr = '[' elements? ']'
    ///
    /// Like ARG_LIST, the ELEMENT_LIST node exists only while the array has
    /// at least one element; `[]` has no list node to keep alive.
    fn parse_array_expr(&mut self) {
        self.start_node(SyntaxKind::ARRAY_EXPR);
        self.bump(); // [
        self.skip_trivia();
        if !self.at(SyntaxKind::R_BRACKET) && !self.at_eof() {
            self.start_node(SyntaxKind::ELEMENT_LIST);
            loop {
                self.parse_expr();
                self.skip_trivia();
                if !self.at(SyntaxKind::COMMA) {
                    break;
                }
                self.bump(); // ,
                self.skip_trivia();
                if self.at(SyntaxKind::R_BRACKET) || self.at_eof() {
                    break;
                }
            }
            self.finish_node();
        }
        self.expect(SyntaxKind::R_BRACKET);
        self.finish_node();
    }
}

/// Binding powers for binary operators; higher binds tighter.
fn binary_binding_power(kind: SyntaxKind) -> Option<u8> {
    let bp = match kind {
        SyntaxKind::PIPE_PIPE => 1,
        SyntaxKind::AMP_AMP => 2,
        SyntaxKind::EQ_EQ | SyntaxKind::BANG_EQ => 3,
        SyntaxKind::LT | SyntaxKind::GT | SyntaxKind::LT_EQ | SyntaxKind::GT_EQ => 4,
        SyntaxKind::PLUS | SyntaxKind::MINUS => 5,
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT => 6,
        _ => return None,
    };
    Some(bp)
}

/// Tokens that can begin an expression.
fn at_expr_start(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IDENT
            | SyntaxKind::INT_NUMBER
            | SyntaxKind::STRING
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW
            | SyntaxKind::NULL_KW
            | SyntaxKind::L_PAREN
            | SyntaxKind::L_BRACKET
            | SyntaxKind::BANG
            | SyntaxKind::MINUS
    )
}
