//! Token maps for Applesoft BASIC.
//!
//! Maps between tree-sitter node kinds, negative ASCII token codes,
//! and keyword lexemes.  Also builds the short variable name guard
//! table used by the minifier.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Map from tree-sitter node kind to negative ASCII token code
pub const TOK_MAP: [(&str,u8);107] = [
    ("tok_end",128),
    ("tok_for",129),
    ("tok_next",130),
    ("tok_data",131),
    ("tok_input",132),
    ("tok_del",133),
    ("tok_dim",134),
    ("tok_read",135),
    ("tok_gr",136),
    ("tok_text",137),
    ("tok_prn",138),
    ("tok_inn",139),
    ("tok_call",140),
    ("tok_plot",141),
    ("tok_hlin",142),
    ("tok_vlin",143),
    ("tok_hgr2",144),
    ("tok_hgr",145),
    ("tok_hcoloreq",146),
    ("tok_hplot",147),
    ("tok_draw",148),
    ("tok_xdraw",149),
    ("tok_htab",150),
    ("tok_home",151),
    ("tok_roteq",152),
    ("tok_scaleeq",153),
    ("tok_shload",154),
    ("tok_trace",155),
    ("tok_notrace",156),
    ("tok_normal",157),
    ("tok_inverse",158),
    ("tok_flash",159),
    ("tok_coloreq",160),
    ("tok_pop",161),
    ("tok_vtab",162),
    ("tok_himem",163),
    ("tok_lomem",164),
    ("tok_onerr",165),
    ("tok_resume",166),
    ("tok_recall",167),
    ("tok_store",168),
    ("tok_speedeq",169),
    ("tok_let",170),
    ("tok_goto",171),
    ("tok_run",172),
    ("tok_if",173),
    ("tok_restore",174),
    ("tok_amp",175),
    ("tok_gosub",176),
    ("tok_return",177),
    ("tok_rem",178),
    ("tok_stop",179),
    ("tok_on",180),
    ("tok_wait",181),
    ("tok_load",182),
    ("tok_save",183),
    ("tok_def",184),
    ("tok_poke",185),
    ("tok_print",186),
    ("tok_cont",187),
    ("tok_list",188),
    ("tok_clear",189),
    ("tok_get",190),
    ("tok_new",191),
    ("tok_tabp",192),
    ("tok_to",193),
    ("tok_fn",194),
    ("tok_spcp",195),
    ("tok_then",196),
    ("tok_at",197),
    ("tok_not",198),
    ("tok_step",199),
    ("tok_plus",200),
    ("tok_minus",201),
    ("tok_times",202),
    ("tok_div",203),
    ("tok_pow",204),
    ("tok_and",205),
    ("tok_or",206),
    ("tok_gtr",207),
    ("tok_eq",208),
    ("tok_less",209),
    ("tok_sgn",210),
    ("tok_int",211),
    ("tok_abs",212),
    ("tok_usr",213),
    ("tok_fre",214),
    ("tok_scrnp",215),
    ("tok_pdl",216),
    ("tok_pos",217),
    ("tok_sqr",218),
    ("tok_rnd",219),
    ("tok_log",220),
    ("tok_exp",221),
    ("tok_cos",222),
    ("tok_sin",223),
    ("tok_tan",224),
    ("tok_atn",225),
    ("tok_peek",226),
    ("tok_len",227),
    ("tok_str",228),
    ("tok_val",229),
    ("tok_asc",230),
    ("tok_chr",231),
    ("tok_left",232),
    ("tok_right",233),
    ("tok_mid",234)
];

/// Map from negative ASCII token code to keyword lexeme
pub const DETOK_MAP: [(u8,&str);107] = [
    (128,"end"),
    (129,"for"),
    (130,"next"),
    (131,"data"),
    (132,"input"),
    (133,"del"),
    (134,"dim"),
    (135,"read"),
    (136,"gr"),
    (137,"text"),
    (138,"pr#"),
    (139,"in#"),
    (140,"call"),
    (141,"plot"),
    (142,"hlin"),
    (143,"vlin"),
    (144,"hgr2"),
    (145,"hgr"),
    (146,"hcolor="),
    (147,"hplot"),
    (148,"draw"),
    (149,"xdraw"),
    (150,"htab"),
    (151,"home"),
    (152,"rot="),
    (153,"scale="),
    (154,"shload"),
    (155,"trace"),
    (156,"notrace"),
    (157,"normal"),
    (158,"inverse"),
    (159,"flash"),
    (160,"color="),
    (161,"pop"),
    (162,"vtab"),
    (163,"himem:"),
    (164,"lomem:"),
    (165,"onerr"),
    (166,"resume"),
    (167,"recall"),
    (168,"store"),
    (169,"speed="),
    (170,"let"),
    (171,"goto"),
    (172,"run"),
    (173,"if"),
    (174,"restore"),
    (175,"&"),
    (176,"gosub"),
    (177,"return"),
    (178,"rem"),
    (179,"stop"),
    (180,"on"),
    (181,"wait"),
    (182,"load"),
    (183,"save"),
    (184,"def"),
    (185,"poke"),
    (186,"print"),
    (187,"cont"),
    (188,"list"),
    (189,"clear"),
    (190,"get"),
    (191,"new"),
    (192,"tab("),
    (193,"to"),
    (194,"fn"),
    (195,"spc("),
    (196,"then"),
    (197,"at"),
    (198,"not"),
    (199,"step"),
    (200,"+"),
    (201,"-"),
    (202,"*"),
    (203,"/"),
    (204,"^"),
    (205,"and"),
    (206,"or"),
    (207,">"),
    (208,"="),
    (209,"<"),
    (210,"sgn"),
    (211,"int"),
    (212,"abs"),
    (213,"usr"),
    (214,"fre"),
    (215,"scrn("),
    (216,"pdl"),
    (217,"pos"),
    (218,"sqr"),
    (219,"rnd"),
    (220,"log"),
    (221,"exp"),
    (222,"cos"),
    (223,"sin"),
    (224,"tan"),
    (225,"atn"),
    (226,"peek"),
    (227,"len"),
    (228,"str$"),
    (229,"val"),
    (230,"asc"),
    (231,"chr$"),
    (232,"left$"),
    (233,"right$"),
    (234,"mid$")
];

/// operator-like lexemes that can follow a variable name with no separator
const GUARD_OPS: [&str;6] = ["to","then","at","step","and","or"];
const GUARD_KINDS: [&str;6] = ["tok_to","tok_then","tok_at","tok_step","tok_and","tok_or"];

static VAR_GUARDS: OnceLock<HashMap<String,Vec<&'static str>>> = OnceLock::new();

/// Map from a 2-character variable name to the trailing token kinds that
/// must be guarded.  A guard is needed when some keyword lexeme matches at
/// the first or second character of the name run together with the token,
/// e.g. `CA` followed by `TO` hides `AT`, so `CATO` would retokenize wrong.
pub fn var_guards() -> &'static HashMap<String,Vec<&'static str>> {
    VAR_GUARDS.get_or_init(|| {
        let mut ans: HashMap<String,Vec<&'static str>> = HashMap::new();
        let alphas = "abcdefghijklmnopqrstuvwxyz";
        for c1 in alphas.chars() {
            for c2 in alphas.chars() {
                let var_name: String = [c1,c2].iter().collect();
                for (i,op) in GUARD_OPS.iter().enumerate() {
                    let test = var_name.clone() + op;
                    for (_code,lex) in &DETOK_MAP {
                        if *lex != var_name && (test.starts_with(lex) || test[1..].starts_with(lex)) {
                            ans.entry(var_name.clone()).or_insert(Vec::new()).push(GUARD_KINDS[i]);
                        }
                    }
                }
            }
        }
        ans
    })
}
